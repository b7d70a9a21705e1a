//! Human rendering of plans and reports

use buildcfg_core::apply::ConfigReport;
use buildcfg_core::plan::{ConfigPlan, Effect};
use buildcfg_core::tasks::TaskKind;

/// Render one effect as a single human-readable line
pub fn effect_line(effect: &Effect) -> String {
    match effect {
        Effect::AddClasspath {
            coordinate,
            resolved_from,
        } => format!("classpath {coordinate} (from {resolved_from})"),
        Effect::AddRepository { module, repository } => {
            format!("repository {repository} -> {module}")
        }
        Effect::SetOutputDir { module, path } => {
            format!("output dir {module} -> {}", path.display())
        }
        Effect::EvaluateAfter {
            module,
            prerequisite,
        } => format!("evaluate {module} after {prerequisite}"),
        Effect::RegisterTask { name, kind } => match kind {
            TaskKind::Delete(path) => format!("task {name}: delete {}", path.display()),
        },
    }
}

/// Render a whole plan, one numbered line per effect
pub fn plan_lines(plan: &ConfigPlan) -> Vec<String> {
    plan.effects
        .iter()
        .enumerate()
        .map(|(i, effect)| format!("{:>3}. {}", i + 1, effect_line(effect)))
        .collect()
}

/// Render a configuration report as detail pairs
pub fn report_details(report: &ConfigReport) -> Vec<(String, String)> {
    let mut details = vec![
        ("modules".to_string(), report.modules.to_string()),
        (
            "repositories".to_string(),
            report.repositories_registered.to_string(),
        ),
        (
            "ordering edges".to_string(),
            report.ordering_edges.to_string(),
        ),
        ("tasks".to_string(), report.tasks.join(", ")),
    ];
    if let Some(dir) = &report.root_output_dir {
        details.insert(1, ("output dir".to_string(), dir.display().to_string()));
    }
    details
}
