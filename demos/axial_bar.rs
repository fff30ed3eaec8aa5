use beamx::{run_analysis, AnalysisConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A 2 m aluminium bar, quadratic elements, self-weight plus a tip pull
    let config = AnalysisConfig::from_json(
        r#"{
            "beam_length": 2.0,
            "num_elements": 4,
            "nodes_per_element": 3,
            "material": { "elastic_modulus": 70.0e9, "area": 0.002, "moment_of_inertia": 0.0 },
            "formulation": "Axial",
            "body_force": 50.0,
            "end_load": { "traction": 1000.0 }
        }"#,
    )?;
    let result = run_analysis(&config)?;

    let coordinates = result.mesh().coordinates();
    for (node, x) in coordinates.iter().enumerate() {
        println!("x = {x:.2} m: u = {:.4e} m", result.displacements()[node]);
    }
    println!("residual norm: {:.2e}", result.residual_norm());

    Ok(())
}
