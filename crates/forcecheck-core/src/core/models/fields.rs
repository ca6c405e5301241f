//! Field handlers of the scenario document and the text formats of its
//! structured block scalars.
//!
//! Decoding is lenient: malformed numbers decode to zero and malformed lines
//! are skipped, each with a warning. A bad entry never invalidates the rest
//! of the document.

use super::config::{Prerequisite, ScenarioConfig};
use super::observables::{ForceTable, MAX_NATOMS, StressTensor};
use crate::core::io::reader::HandlerTable;
use nalgebra::Vector3;
use tracing::warn;

pub const LAMMPS_VERSION: &str = "lammps_version";
pub const DATE_GENERATED: &str = "date_generated";
pub const EPSILON: &str = "epsilon";
pub const PREREQUISITES: &str = "prerequisites";
pub const PRE_COMMANDS: &str = "pre_commands";
pub const POST_COMMANDS: &str = "post_commands";
pub const INPUT_FILE: &str = "input_file";
pub const BOND_STYLE: &str = "bond_style";
pub const BOND_COEFF: &str = "bond_coeff";
pub const NATOMS: &str = "natoms";
pub const INIT_ENERGY: &str = "init_energy";
pub const RUN_ENERGY: &str = "run_energy";
pub const INIT_STRESS: &str = "init_stress";
pub const RUN_STRESS: &str = "run_stress";
pub const INIT_FORCES: &str = "init_forces";
pub const RUN_FORCES: &str = "run_forces";

/// The handler table that maps every document key onto [`ScenarioConfig`].
pub fn handlers() -> HandlerTable<ScenarioConfig> {
    HandlerTable::<ScenarioConfig>::new()
        .register(LAMMPS_VERSION, |c, v| c.lammps_version = v.to_string())
        .register(DATE_GENERATED, |c, v| c.date_generated = v.to_string())
        .register(EPSILON, |c, v| c.epsilon = parse_real(EPSILON, v))
        .register(PREREQUISITES, |c, v| c.prerequisites = parse_prerequisites(v))
        .register(PRE_COMMANDS, |c, v| c.pre_commands = parse_commands(v))
        .register(POST_COMMANDS, |c, v| c.post_commands = parse_commands(v))
        .register(INPUT_FILE, |c, v| c.input_file = v.to_string())
        .register(BOND_STYLE, |c, v| c.bond_style = v.to_string())
        .register(BOND_COEFF, |c, v| c.bond_coeff = parse_commands(v))
        .register(NATOMS, |c, v| c.natoms = parse_natoms(v))
        .register(INIT_ENERGY, |c, v| c.init_energy = parse_real(INIT_ENERGY, v))
        .register(RUN_ENERGY, |c, v| c.run_energy = parse_real(RUN_ENERGY, v))
        .register(INIT_STRESS, |c, v| c.init_stress = parse_stress(INIT_STRESS, v))
        .register(RUN_STRESS, |c, v| c.run_stress = parse_stress(RUN_STRESS, v))
        .register(INIT_FORCES, |c, v| {
            c.init_forces = parse_forces(INIT_FORCES, v, c.natoms)
        })
        .register(RUN_FORCES, |c, v| {
            c.run_forces = parse_forces(RUN_FORCES, v, c.natoms)
        })
}

fn parse_number<T: std::str::FromStr + Default>(key: &str, text: &str) -> T {
    let trimmed = text.trim();
    trimmed.parse().unwrap_or_else(|_| {
        warn!(key, value = %trimmed, "Malformed numeric value; using zero.");
        T::default()
    })
}

/// Decimal reals, plus the YAML spellings of infinity and NaN that the
/// document writer produces for non-finite values.
pub fn parse_real(key: &str, text: &str) -> f64 {
    match text.trim() {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => f64::INFINITY,
        "-.inf" | "-.Inf" | "-.INF" => f64::NEG_INFINITY,
        ".nan" | ".NaN" | ".NAN" => f64::NAN,
        _ => parse_number(key, text),
    }
}

pub fn parse_count(key: &str, text: &str) -> usize {
    parse_number(key, text)
}

/// Particle count of the document. Counts no force table could hold decode
/// to zero, like any other malformed number.
pub fn parse_natoms(text: &str) -> usize {
    let natoms = parse_count(NATOMS, text);
    if natoms > MAX_NATOMS {
        warn!(natoms, max = MAX_NATOMS, "Particle count too large; using zero.");
        return 0;
    }
    natoms
}

/// Non-blank lines of a block scalar.
pub fn block_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

pub fn parse_commands(text: &str) -> Vec<String> {
    block_lines(text).map(str::to_string).collect()
}

pub fn parse_prerequisites(text: &str) -> Vec<Prerequisite> {
    block_lines(text)
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next()) {
                (Some(category), Some(style)) => Some(Prerequisite::new(category, style)),
                _ => {
                    warn!(line, "Skipping invalid prerequisite line.");
                    None
                }
            }
        })
        .collect()
}

pub fn parse_stress(key: &str, text: &str) -> StressTensor {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != 6 {
        warn!(
            key,
            found = tokens.len(),
            "Stress block should hold exactly six values."
        );
    }
    let mut components = [0.0; 6];
    for (slot, token) in components.iter_mut().zip(tokens) {
        *slot = parse_real(key, token);
    }
    StressTensor::from_components(components)
}

/// Decodes `"<tag> <x> <y> <z>"` lines into a table sized for `natoms`.
///
/// Each line lands in the slot named by its tag. Lines whose tag does not
/// parse or does not fit the table are skipped.
pub fn parse_forces(key: &str, text: &str, natoms: usize) -> ForceTable {
    let mut table = ForceTable::try_with_natoms(natoms).unwrap_or_else(|e| {
        warn!(key, error = %e, "Force table cannot be sized; keeping it empty.");
        ForceTable::default()
    });
    for line in block_lines(text) {
        let mut tokens = line.split_whitespace();
        let Some(tag) = tokens.next().and_then(|t| t.parse::<usize>().ok()) else {
            warn!(key, line, "Skipping force line with invalid tag.");
            continue;
        };
        let mut xyz = [0.0; 3];
        for slot in xyz.iter_mut() {
            match tokens.next() {
                Some(token) => *slot = parse_real(key, token),
                None => warn!(key, line, "Force line has fewer than three components."),
            }
        }
        if let Err(e) = table.set(tag, Vector3::new(xyz[0], xyz[1], xyz[2])) {
            warn!(key, line, error = %e, "Skipping force line.");
        }
    }
    table
}

pub fn format_prerequisite(prerequisite: &Prerequisite) -> String {
    format!("{} {}", prerequisite.category, prerequisite.style)
}

pub fn format_real(value: f64) -> String {
    format!("{:.16e}", value)
}

pub fn format_stress(stress: &StressTensor) -> String {
    stress
        .components()
        .iter()
        .map(|&c| format!("{:>23}", format_real(c)))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_start()
        .to_string()
}

pub fn format_force_line(tag: usize, force: &Vector3<f64>) -> String {
    format!(
        "{} {:>23} {:>23} {:>23}",
        tag,
        format_real(force.x),
        format_real(force.y),
        format_real(force.z)
    )
}

pub fn format_forces(table: &ForceTable) -> Vec<String> {
    table
        .iter()
        .map(|(tag, force)| format_force_line(tag, force))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_lines_land_in_tag_slots() {
        let text = "1 0.1 0.2 0.3\n2 -0.1 0.0 0.1\n3 0.5 0.5 0.5\n";
        let table = parse_forces(INIT_FORCES, text, 3);
        assert_eq!(table.len(), 4);
        assert_eq!(table.as_slice()[0], Vector3::zeros());
        assert_eq!(table.get(2), Some(&Vector3::new(-0.1, 0.0, 0.1)));
    }

    #[test]
    fn force_lines_out_of_order_still_address_by_tag() {
        let text = "3 3.0 3.0 3.0\n1 1.0 1.0 1.0\n";
        let table = parse_forces(INIT_FORCES, text, 3);
        assert_eq!(table.get(1), Some(&Vector3::new(1.0, 1.0, 1.0)));
        assert_eq!(table.get(2), Some(&Vector3::zeros()));
        assert_eq!(table.get(3), Some(&Vector3::new(3.0, 3.0, 3.0)));
    }

    #[test]
    fn force_line_with_tag_beyond_natoms_is_skipped() {
        let text = "1 1.0 2.0 3.0\n7 9.0 9.0 9.0\n";
        let table = parse_forces(RUN_FORCES, text, 2);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(1), Some(&Vector3::new(1.0, 2.0, 3.0)));
        assert!(table.iter().all(|(_, f)| f.x != 9.0));
    }

    #[test]
    fn force_line_with_invalid_tag_is_skipped() {
        let text = "x 1.0 2.0 3.0\n-1 1.0 1.0 1.0\n0 5.0 5.0 5.0\n2 4.0 4.0 4.0\n";
        let table = parse_forces(INIT_FORCES, text, 2);
        assert_eq!(table.as_slice()[0], Vector3::zeros());
        assert_eq!(table.get(1), Some(&Vector3::zeros()));
        assert_eq!(table.get(2), Some(&Vector3::new(4.0, 4.0, 4.0)));
    }

    #[test]
    fn forces_before_natoms_fit_nothing() {
        let table = parse_forces(INIT_FORCES, "1 1.0 1.0 1.0\n", 0);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn huge_particle_count_decodes_to_zero() {
        assert_eq!(parse_natoms("18446744073709551615"), 0);
        assert_eq!(parse_natoms("10000001"), 0);
        assert_eq!(parse_natoms("29"), 29);
    }

    #[test]
    fn forces_for_huge_particle_count_stay_empty() {
        let table = parse_forces(INIT_FORCES, "1 1.0 1.0 1.0\n", usize::MAX);
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_force_component_decodes_to_zero() {
        let table = parse_forces(INIT_FORCES, "1 1.0 abc\n", 1);
        assert_eq!(table.get(1), Some(&Vector3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn malformed_reals_decode_to_zero() {
        assert_eq!(parse_real(EPSILON, "not-a-number"), 0.0);
        assert_eq!(parse_real(EPSILON, " 1e-10 "), 1e-10);
        assert_eq!(parse_count(NATOMS, "-4"), 0);
        assert_eq!(parse_count(NATOMS, "29"), 29);
    }

    #[test]
    fn yaml_spellings_of_non_finite_reals_are_understood() {
        assert_eq!(parse_real(INIT_ENERGY, ".inf"), f64::INFINITY);
        assert_eq!(parse_real(INIT_ENERGY, "+.Inf"), f64::INFINITY);
        assert_eq!(parse_real(RUN_ENERGY, "-.inf"), f64::NEG_INFINITY);
        assert!(parse_real(RUN_ENERGY, ".NaN").is_nan());
        assert_eq!(parse_real(RUN_ENERGY, "-inf"), f64::NEG_INFINITY);
    }

    #[test]
    fn commands_are_kept_verbatim_without_blank_lines() {
        let text = "variable newton_bond index on\n\nbond_modify  table 0\n";
        assert_eq!(
            parse_commands(text),
            vec!["variable newton_bond index on", "bond_modify  table 0"]
        );
    }

    #[test]
    fn prerequisites_split_on_whitespace_and_skip_incomplete_lines() {
        let text = "atom bond\nbond\tharmonic\nfix\n  \ncompute   pe/atom extra\n";
        assert_eq!(
            parse_prerequisites(text),
            vec![
                Prerequisite::new("atom", "bond"),
                Prerequisite::new("bond", "harmonic"),
                Prerequisite::new("compute", "pe/atom"),
            ]
        );
    }

    #[test]
    fn stress_reads_six_components_in_order() {
        let stress = parse_stress(INIT_STRESS, " 1.5 -2.0 3e-3\n 4 5 6\n");
        assert_eq!(stress.components(), [1.5, -2.0, 3e-3, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn short_stress_block_zero_fills() {
        let stress = parse_stress(RUN_STRESS, "1.0 2.0");
        assert_eq!(stress.components(), [1.0, 2.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn formatted_values_keep_full_precision() {
        let value = 1.0 / 3.0;
        let line = format_force_line(12, &Vector3::new(value, -value, 0.0));
        let tokens: Vec<&str> = line.split_whitespace().collect();
        assert_eq!(tokens[0], "12");
        assert_eq!(tokens[1].parse::<f64>().unwrap(), value);
        assert_eq!(tokens[2].parse::<f64>().unwrap(), -value);

        let stress = StressTensor::from_components([value; 6]);
        let reparsed = parse_stress(INIT_STRESS, &format_stress(&stress));
        assert_eq!(reparsed, stress);
    }

    #[test]
    fn handler_table_covers_every_document_key() {
        let table = handlers();
        for key in [
            LAMMPS_VERSION,
            DATE_GENERATED,
            EPSILON,
            PREREQUISITES,
            PRE_COMMANDS,
            POST_COMMANDS,
            INPUT_FILE,
            BOND_STYLE,
            BOND_COEFF,
            NATOMS,
            INIT_ENERGY,
            RUN_ENERGY,
            INIT_STRESS,
            RUN_STRESS,
            INIT_FORCES,
            RUN_FORCES,
        ] {
            assert!(table.contains(key), "missing handler for {key}");
        }
        assert_eq!(table.len(), 16);
    }
}
