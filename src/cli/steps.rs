// ABOUTME: CLI steps command - print the guided tour step catalog for a screen and role

use super::{OutputFormat, Screen, StepsArgs};
use crate::config::AppConfig;
use crate::models::Role;
use crate::tour::{order_catalog, report_catalog, ReportMode, Step};
use anyhow::Result;
use serde::Serialize;

/// One catalog entry as printed
#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    pub index: usize,
    #[serde(flatten)]
    pub step: Step,
    pub auto_advances: bool,
}

/// Execute the steps command
pub fn execute(args: StepsArgs, format: OutputFormat) -> Result<()> {
    let role = match args.role {
        Some(role) => role,
        None => AppConfig::load()?.role,
    };
    let steps = catalog_for(args.screen, role, args.commercial_added);

    match format {
        OutputFormat::Json => output_json(&steps)?,
        OutputFormat::Text => output_text(&steps),
    }
    Ok(())
}

/// Steps with their positions, as the tour would present them
pub fn catalog_for(screen: Screen, role: Role, commercial_added: bool) -> Vec<StepInfo> {
    let steps = match screen {
        Screen::Order => order_catalog(role),
        Screen::Report => report_catalog(role, ReportMode { commercial_added }),
    };
    steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| StepInfo {
            index,
            auto_advances: step.auto_advances(),
            step,
        })
        .collect()
}

fn output_json(steps: &[StepInfo]) -> Result<()> {
    let json = serde_json::to_string_pretty(steps)?;
    println!("{json}");
    Ok(())
}

fn output_text(steps: &[StepInfo]) {
    println!("{:<4} {:<26} {:<22} {:<9} ADVANCE", "#", "KEY", "TARGET", "REQUIRED");
    println!("{}", "-".repeat(72));
    for info in steps {
        let advance = if info.auto_advances {
            "auto"
        } else {
            "manual"
        };
        println!(
            "{:<4} {:<26} {:<22} {:<9} {}",
            info.index + 1,
            format!("{:?}", info.step.key),
            format!("{:?}", info.step.target),
            if info.step.required { "yes" } else { "no" },
            advance
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::StepKey;

    #[test]
    fn test_catalog_for_indexes_steps() {
        let steps = catalog_for(Screen::Report, Role::Commercial, false);
        assert_eq!(steps[0].index, 0);
        assert_eq!(steps[1].step.key, StepKey::ReportClientType);
        assert!(steps.last().is_some_and(|s| !s.step.required));
    }

    #[test]
    fn test_json_flattens_step_fields() {
        let steps = catalog_for(Screen::Order, Role::Hybrid, false);
        let value = serde_json::to_value(&steps[1]).unwrap();
        assert_eq!(value["index"], 1);
        assert_eq!(value["key"], "order_client_type");
        assert_eq!(value["auto_advances"], true);
    }
}
