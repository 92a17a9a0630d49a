//! Build validation: a diagnostic report collected before a run starts.
//! Errors abort the run before any simulated time elapses; warnings are
//! surfaced but do not block.

use std::fmt;

use crate::combat::spellbook;
use crate::data::build::BuildConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
    }
}

/// Validate a build before constructing a simulation from it.
pub fn validate_build(build: &BuildConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if build.simulators == 0 || build.simulators > 10_000 {
        report.push(
            ValidationSeverity::Error,
            "simulators",
            format!("must be within 1..=10000, got {}", build.simulators),
        );
    }
    if build.targets == 0 || build.targets > 20 {
        report.push(
            ValidationSeverity::Error,
            "targets",
            format!("must be within 1..=20, got {}", build.targets),
        );
    }
    if !(0.0..=1.0).contains(&build.mitigation) {
        report.push(
            ValidationSeverity::Error,
            "mitigation",
            format!("must be a fraction within 0..=1, got {}", build.mitigation),
        );
    }
    if build.simulation_time_ms <= 0 {
        report.push(
            ValidationSeverity::Error,
            "simulation_time_ms",
            format!("must be positive, got {}", build.simulation_time_ms),
        );
    }
    if build.mana <= 0.0 {
        report.push(
            ValidationSeverity::Error,
            "mana",
            format!("starting mana must be positive, got {}", build.mana),
        );
    }
    if build.auto_attack && build.stats.attack_speed <= 0.0 {
        report.push(
            ValidationSeverity::Error,
            "auto_attack",
            "enabled but attack_speed is not positive",
        );
    }

    if build.abilities.is_empty() {
        report.push(ValidationSeverity::Error, "abilities", "no abilities chosen");
    }
    for (index, entry) in build.abilities.iter().enumerate() {
        let profile = spellbook::profile(entry.id);
        let context = format!("abilities[{index}]");
        if entry.rank == 0 || entry.rank > profile.max_rank {
            report.push(
                ValidationSeverity::Error,
                context.clone(),
                format!(
                    "{} rank {} is out of bounds (1..={})",
                    profile.name, entry.rank, profile.max_rank
                ),
            );
        }
        if build.abilities[..index].iter().any(|e| e.id == entry.id) {
            report.push(
                ValidationSeverity::Warning,
                context.clone(),
                format!("{} appears more than once", profile.name),
            );
        }
        if let Some(cooldown) = entry.condition.cooldown {
            if !build.abilities.iter().any(|e| e.id == cooldown.ability) {
                report.push(
                    ValidationSeverity::Warning,
                    context,
                    format!(
                        "cooldown condition references {}, which is not in the build",
                        spellbook::profile(cooldown.ability).name
                    ),
                );
            }
        }
    }

    if build.queue.is_empty() {
        report.push(
            ValidationSeverity::Warning,
            "queue",
            "cast queue is empty; the rotation will never cast",
        );
    }
    for (index, id) in build.queue.iter().enumerate() {
        if !build.abilities.iter().any(|entry| entry.id == *id) {
            report.push(
                ValidationSeverity::Error,
                format!("queue[{index}]"),
                format!("{} is not among the chosen abilities", spellbook::profile(*id).name),
            );
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ability::{AbilityId, CastCondition, CooldownCondition};
    use crate::data::build::{sample_build, AbilityEntry};

    #[test]
    fn sample_build_passes() {
        let report = validate_build(&sample_build());
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
    }

    #[test]
    fn out_of_bounds_rank_names_the_ability() {
        let mut build = sample_build();
        build.abilities[0].rank = 9;
        let report = validate_build(&build);
        assert!(report.has_errors());
        let message = report.errors().next().unwrap().to_string();
        assert!(message.contains("Ice Bolt"), "got: {message}");
        assert!(message.contains('9'), "got: {message}");
    }

    #[test]
    fn queue_entry_without_ability_is_an_error() {
        let mut build = sample_build();
        build.queue.push(AbilityId::Slash);
        let report = validate_build(&build);
        assert!(report.has_errors());
    }

    #[test]
    fn dangling_cooldown_condition_is_a_warning() {
        let mut build = sample_build();
        build.abilities.push(AbilityEntry {
            id: AbilityId::ManaPotion,
            rank: 1,
            once: false,
            condition: CastCondition {
                cooldown: Some(CooldownCondition {
                    ability: AbilityId::Teleport,
                    negated: false,
                }),
                ..CastCondition::default()
            },
        });
        let report = validate_build(&build);
        assert!(!report.has_errors());
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.severity == ValidationSeverity::Warning && d.message.contains("Teleport")));
    }

    #[test]
    fn range_checks_cover_simulators_targets_mitigation() {
        let mut build = sample_build();
        build.simulators = 20_000;
        build.targets = 0;
        build.mitigation = 1.5;
        let report = validate_build(&build);
        let error_contexts: Vec<_> = report.errors().map(|d| d.context.as_str()).collect();
        assert!(error_contexts.contains(&"simulators"));
        assert!(error_contexts.contains(&"targets"));
        assert!(error_contexts.contains(&"mitigation"));
    }
}
