use anyhow::Result;
use std::path::PathBuf;

use crate::commands::CommandReport;
use aoc_relay::relay::scaffold;

#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub dir: PathBuf,
}

pub fn run(opts: &ScaffoldOptions) -> Result<CommandReport> {
    let mut report = CommandReport::new("scaffold");
    report.detail(format!("dir={}", opts.dir.display()));

    let outcome = scaffold::generate(&opts.dir)?;
    report.detail(format!("created={}", outcome.created.len()));
    report.detail(format!("skipped_existing={}", outcome.skipped));
    report.detail(format!(
        "template={}",
        if outcome.used_custom_template {
            scaffold::TEMPLATE_FILE
        } else {
            "builtin"
        }
    ));
    Ok(report)
}
