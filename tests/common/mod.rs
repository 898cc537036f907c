use terraflora_lib::model::{MapRequest, SimConfig, Simulation};

#[allow(dead_code)]
pub fn generated(width: i32, height: i32, passes: u32, seed: &str) -> Simulation {
    generated_with(SimConfig::default(), width, height, passes, seed)
}

#[allow(dead_code)]
pub fn generated_with(
    config: SimConfig,
    width: i32,
    height: i32,
    passes: u32,
    seed: &str,
) -> Simulation {
    let mut sim = Simulation::new(config);
    sim.generate_map(&MapRequest::new(width, height, passes, Some(seed)));
    sim
}

/// Row-major vegetation values, `None` on water.
#[allow(dead_code)]
pub fn vegetation_values(sim: &Simulation) -> Vec<Option<f64>> {
    let column = sim.species().vegetation();
    (0..column.len())
        .map(|idx| column.get(idx).map(|v| v.value()))
        .collect()
}
