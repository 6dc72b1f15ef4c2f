use crate::{cli, plugin::HookOutcome};

pub fn build_report(outcome: &HookOutcome, mode: cli::ReportMode) -> String {
    match mode {
        cli::ReportMode::Off => String::new(),
        cli::ReportMode::Summary => summary(outcome, false),
        cli::ReportMode::Full => summary(outcome, true),
    }
}

fn summary(outcome: &HookOutcome, full: bool) -> String {
    let mut out = String::new();

    out.push_str("entrygen report\n");
    out.push_str("===============\n");

    let (config_path, resolution, patched) = match outcome {
        HookOutcome::Skipped => {
            out.push_str("status: skipped (already ran in this process)\n");
            return out;
        }
        HookOutcome::NoPaths => {
            out.push_str("status: nothing to do (no paths declared)\n");
            return out;
        }
        HookOutcome::Patched {
            config_path,
            resolution,
            patched,
        } => (config_path, resolution, patched),
    };

    out.push_str(&format!("config: {}\n", config_path.display()));
    out.push_str(&format!(
        "declaration: replaced={} inserted={}\n",
        patched.replaced, patched.inserted
    ));
    out.push_str(&format!("entries: {}\n", resolution.entries.len()));

    out.push_str("\npaths\n");
    for spec in &resolution.specs {
        match &spec.failure {
            None => out.push_str(&format!("  - {} ({} entries)\n", spec.label, spec.contributed)),
            Some(e) => out.push_str(&format!("  - {} (failed: {})\n", spec.label, e)),
        }
    }

    if full {
        out.push_str("\nentries\n");
        for e in resolution.entries.as_slice() {
            out.push_str(&format!("  {e}\n"));
        }
    }

    out
}
