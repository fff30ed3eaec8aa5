use beamx::{run_analysis, AnalysisConfig, EndLoad};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A 10 m steel cantilever clamped at x = 0 with a 1 N downward tip load
    let config = AnalysisConfig {
        end_load: EndLoad {
            transverse: -1.0,
            ..EndLoad::default()
        },
        ..AnalysisConfig::default()
    };
    let result = run_analysis(&config)?;

    for node in 0..result.mesh().num_nodes() {
        if let Some(displacement) = result.node_displacement(node) {
            println!(
                "node {node}: u = {:.3e} m, v = {:.3e} m, theta = {:.3e} rad",
                displacement.axial, displacement.transverse, displacement.rotation
            );
        }
    }

    // Closed form for comparison
    let material = config.material;
    let expected = config.end_load.transverse * config.beam_length.powi(3)
        / (3.0 * material.flexural_rigidity());
    println!("closed-form tip deflection: {expected:.3e} m");

    for (dof, reaction) in result.reactions() {
        println!("reaction at DOF {dof}: {reaction:.3}");
    }

    Ok(())
}
