use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use zombie_pursuit_core::config::SimConfig;
use zombie_pursuit_core::grid::Position;
use zombie_pursuit_core::simulation::{Population, Simulation};

/// PyO3 module exposing zombie-pursuit-core to a Python GUI harness.
#[pyfunction]
fn version() -> &'static str {
    "0.1.0"
}

fn value_error<E: std::fmt::Display>(err: E) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn positions(cells: Option<Vec<(usize, usize)>>) -> Vec<Position> {
    cells
        .unwrap_or_default()
        .into_iter()
        .map(Position::from)
        .collect()
}

fn pairs(cells: impl Iterator<Item = Position>) -> Vec<(usize, usize)> {
    cells.map(<(usize, usize)>::from).collect()
}

#[pyclass(name = "Simulation")]
struct PySimulation {
    inner: Simulation,
}

#[pymethods]
impl PySimulation {
    #[new]
    #[pyo3(signature = (grid_height, grid_width, obstacle_list=None, zombie_list=None, human_list=None, seed=42))]
    fn new(
        grid_height: usize,
        grid_width: usize,
        obstacle_list: Option<Vec<(usize, usize)>>,
        zombie_list: Option<Vec<(usize, usize)>>,
        human_list: Option<Vec<(usize, usize)>>,
        seed: u64,
    ) -> PyResult<Self> {
        let config = SimConfig {
            height: grid_height,
            width: grid_width,
            seed,
            obstacles: positions(obstacle_list),
            zombies: positions(zombie_list),
            humans: positions(human_list),
        };
        let inner = Simulation::try_new(&config).map_err(value_error)?;
        Ok(Self { inner })
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let config: SimConfig = serde_json::from_str(json).map_err(value_error)?;
        let inner = Simulation::try_new(&config).map_err(value_error)?;
        Ok(Self { inner })
    }

    fn get_grid_height(&self) -> usize {
        self.inner.height()
    }

    fn get_grid_width(&self) -> usize {
        self.inner.width()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn set_obstacle(&mut self, row: usize, col: usize) -> PyResult<()> {
        self.inner
            .set_obstacle(Position::new(row, col))
            .map_err(value_error)
    }

    fn set_empty(&mut self, row: usize, col: usize) -> PyResult<()> {
        self.inner
            .set_empty(Position::new(row, col))
            .map_err(value_error)
    }

    fn is_obstacle(&self, row: usize, col: usize) -> PyResult<bool> {
        self.inner
            .is_obstacle(Position::new(row, col))
            .map_err(value_error)
    }

    fn add_zombie(&mut self, row: usize, col: usize) -> PyResult<()> {
        self.inner
            .add_zombie(Position::new(row, col))
            .map_err(value_error)
    }

    fn add_human(&mut self, row: usize, col: usize) -> PyResult<()> {
        self.inner
            .add_human(Position::new(row, col))
            .map_err(value_error)
    }

    fn num_zombies(&self) -> usize {
        self.inner.num_zombies()
    }

    fn num_humans(&self) -> usize {
        self.inner.num_humans()
    }

    fn zombies(&self) -> Vec<(usize, usize)> {
        pairs(self.inner.zombies())
    }

    fn humans(&self) -> Vec<(usize, usize)> {
        pairs(self.inner.humans())
    }

    /// Distance field seeded from `"zombie"` or `"human"`, as a list of rows.
    fn compute_distance_field(&self, entity_type: &str) -> PyResult<Vec<Vec<usize>>> {
        let population = match entity_type {
            "zombie" => Population::Zombies,
            "human" => Population::Humans,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown entity type {other:?}, expected \"zombie\" or \"human\""
                )))
            }
        };
        let field = self.inner.distance_field(population);
        Ok(field.rows().map(<[usize]>::to_vec).collect())
    }

    fn move_zombies(&mut self) {
        self.inner.move_zombies();
    }

    fn move_humans(&mut self) {
        self.inner.move_humans();
    }

    fn step(&mut self) {
        self.inner.step();
    }

    fn reseed(&mut self, seed: u64) {
        self.inner.reseed(seed);
    }

    /// Runs an experiment and returns the summary as a JSON string.
    fn run_experiment(&mut self, steps: usize, sample_every: usize) -> PyResult<String> {
        let summary = self
            .inner
            .try_run_experiment(steps, sample_every)
            .map_err(value_error)?;
        serde_json::to_string(&summary).map_err(value_error)
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_class::<PySimulation>()?;
    Ok(())
}
