//! Shape analysis of ferrocene
//!
//! Builds an idealized staggered ferrocene, detects the two η⁵-Cp rings,
//! classifies the sandwich and ranks the centroid model against the CN 2
//! reference shapes. Run with `RUST_LOG=debug` to follow the rotation search.

use std::f64::consts::TAU;

use cshm_mol::{analyze, AnalysisConfig, Atom, Element, LigandGroup, Progress, SearchControl, SearchMode, Stage};
use lin_alg::f64::Vec3;

fn cp_ring(atoms: &mut Vec<Atom>, z: f64, phase: f64) {
    for k in 0..5 {
        let a = phase + TAU * k as f64 / 5.0;
        atoms.push(Atom::new(Element::CARBON, Vec3::new(1.2 * a.cos(), 1.2 * a.sin(), z)));
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut atoms = vec![Atom::new(Element::IRON, Vec3::new(0.0, 0.0, 0.0))];
    cp_ring(&mut atoms, 1.65, 0.0);
    cp_ring(&mut atoms, -1.65, 36f64.to_radians());
    let coordinating: Vec<usize> = (1..atoms.len()).collect();

    let mut config = AnalysisConfig::default();
    config.optimizer.mode = SearchMode::Intensive;

    let report = |p: &Progress| {
        if p.stage == Stage::Complete {
            log::debug!("search complete, best {:.4}", p.best_measure);
        }
    };
    let control = SearchControl::none().with_progress(&report);

    let analysis = match analyze(&atoms, 0, &coordinating, &config, &control) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Pattern: {} (confidence {:.2}), CN {}",
        analysis.pattern.pattern.name(),
        analysis.pattern.confidence,
        analysis.coordination_number()
    );
    for group in &analysis.groups.groups {
        match group {
            LigandGroup::Ring(ring) => println!("  {} ring: atoms {:?}", ring.hapticity.label, ring.atom_indices),
            LigandGroup::Monodentate { atom_index } => println!("  monodentate atom {}", atom_index),
        }
    }
    println!("{:<28} {:>10}", "Geometry", "CShM");
    for result in &analysis.ranking.results {
        println!("{:<28} {:>10.4}", result.geometry_name, result.measure);
    }
}
