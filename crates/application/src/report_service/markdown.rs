use std::fmt::Write as _;

use ecr_audit_domain::AuditRow;

use super::report::{AuditReport, ClusterSection, ClusterSectionOutcome};

/// Title line that opens every report.
pub const REPORT_TITLE: &str = "# ECR Image Audit Report";

const TABLE_HEADER: &str =
    "| Image Name | Image Creation Date | ECS Service | Owning Team | Status |";
const TABLE_DIVIDER: &str =
    "|------------|---------------------|-------------|-------------|--------|";
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

impl AuditReport {
    /// Renders the report as markdown, one table per cluster.
    #[must_use]
    pub fn render_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str(REPORT_TITLE);
        output.push('\n');

        for section in self.sections() {
            render_section(&mut output, section);
        }

        output
    }
}

fn render_section(output: &mut String, section: &ClusterSection) {
    let _ = write!(output, "\n### {} Images\n\n", escape_cell(section.cluster_name()));

    match section.outcome() {
        ClusterSectionOutcome::Unavailable { reason } => {
            let _ = writeln!(output, "> Unable to list services: {reason}");
        }
        ClusterSectionOutcome::Audited { rows, .. } => {
            output.push_str(TABLE_HEADER);
            output.push('\n');
            output.push_str(TABLE_DIVIDER);
            output.push('\n');
            for row in rows {
                render_row(output, row);
            }
        }
    }
}

fn render_row(output: &mut String, row: &AuditRow) {
    let _ = writeln!(
        output,
        "| {} | {} | {} | {} | {} |",
        escape_cell(row.image().to_string().as_str()),
        row.created_at().format(CREATED_AT_FORMAT),
        escape_cell(row.service().as_str()),
        escape_cell(row.team().as_str()),
        row.status().symbol(),
    );
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}
