use crate::analyze::{IssueAnalyzed, MilestoneAnalyzed, MilestonesAnalyzed, UserAnalyzed};
use crate::model::{Duration, Project, Result};
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};
use std::fs;
use std::path::{Path, PathBuf};

pub trait MarkdownReport {
    fn report_create(&self, project: &Project, dir: &Path) -> Result<PathBuf>;
}

impl MarkdownReport for MilestonesAnalyzed {
    /// Writes `<dir>/<project id>.md` covering every milestone of `project`.
    fn report_create(&self, project: &Project, dir: &Path) -> Result<PathBuf> {
        let mut doc = Markdown::new();

        doc.header1(format!("Time tracking: {}", project.name));
        for analyzed in self.iter().filter(|m| m.milestone.project == project.id) {
            doc.add_milestone(analyzed);
        }

        let path = dir.join(format!("{}.md", project.id));
        fs::write(&path, doc.render())?;
        Ok(path)
    }
}

trait MarkdownExt {
    fn add_milestone(&mut self, analyzed: &MilestoneAnalyzed);
    fn add_burndown(&mut self, analyzed: &MilestoneAnalyzed);
    fn add_users(&mut self, users: &[UserAnalyzed]);
    fn add_issues(&mut self, issues: &[IssueAnalyzed]);
    fn add_table(&mut self, header: Vec<Heading>, table: Vec<Vec<String>>);
}

impl MarkdownExt for Markdown {
    fn add_milestone(&mut self, analyzed: &MilestoneAnalyzed) {
        let due = analyzed
            .milestone
            .due_date
            .map(|due| due.format("%d.%m.%Y").to_string())
            .unwrap_or_else(|| "no due date".to_string());
        self.header2(format!(
            "{} ({} - {})",
            analyzed.milestone.name,
            analyzed.start.format("%d.%m.%Y"),
            due,
        ));
        self.paragraph(format!(
            "Complete: **{}** · Milestone velocity: **{}** · Team average velocity: **{}**",
            percent(analyzed.completeness),
            metric(analyzed.velocity),
            metric(analyzed.average_velocity),
        ));

        self.add_burndown(analyzed);
        self.add_users(&analyzed.users);
        self.add_issues(&analyzed.issues);
    }

    fn add_burndown(&mut self, analyzed: &MilestoneAnalyzed) {
        if analyzed.burndown.is_empty() {
            self.paragraph("*Not enough data for a burndown.*".to_string());
            return;
        }

        let row = analyzed
            .burndown
            .iter()
            .map(|(day, _)| day.date().format("%d.%m").to_string())
            .map(|s| Heading::new(s, Some(HeadingAlignment::Center)))
            .collect::<Vec<_>>();
        let header = [vec![Heading::new("".to_string(), None)], row].concat();

        let row = analyzed
            .burndown
            .iter()
            .map(|(_, effort)| hours(*effort))
            .collect::<Vec<_>>();
        let table = vec![[vec!["Effort remaining".to_string()], row].concat()];

        self.add_table(header, table);
    }

    fn add_users(&mut self, users: &[UserAnalyzed]) {
        if users.is_empty() {
            return;
        }

        let row = users
            .iter()
            .map(|u| u.user.full_name_or_username())
            .map(|s| format!("**{s}**"))
            .map(|s| Heading::new(s, Some(HeadingAlignment::Center)))
            .collect::<Vec<_>>();
        let header = [vec![Heading::new("".to_string(), None)], row].concat();

        let mut table = vec![];

        let row = users.iter().map(|u| metric(u.velocity)).collect::<Vec<_>>();
        table.push([vec!["Velocity".to_string()], row].concat());

        let row = users
            .iter()
            .map(|u| metric(u.current_velocity))
            .collect::<Vec<_>>();
        table.push([vec!["Velocity, last 7 days".to_string()], row].concat());

        let row = users
            .iter()
            .map(|u| metric(u.week_velocity))
            .collect::<Vec<_>>();
        table.push([vec!["Velocity, this week".to_string()], row].concat());

        let row = users
            .iter()
            .map(|u| metric(u.hours_per_day))
            .collect::<Vec<_>>();
        table.push([vec!["Hours per active day".to_string()], row].concat());

        let row = users.iter().map(|u| metric(u.week_hours)).collect::<Vec<_>>();
        table.push([vec!["Hours per active day, this week".to_string()], row].concat());

        let row = users
            .iter()
            .map(|u| hours(u.logged_in_milestone))
            .collect::<Vec<_>>();
        table.push([vec!["Logged in milestone".to_string()], row].concat());

        self.add_table(header, table);
    }

    fn add_issues(&mut self, issues: &[IssueAnalyzed]) {
        if issues.is_empty() {
            self.paragraph("*No issues.*".to_string());
            return;
        }

        let header = ["Issue", "Summary", "Estimate", "Remaining", ""]
            .into_iter()
            .map(|s| Heading::new(s.to_string(), None))
            .collect::<Vec<_>>();
        let table = issues
            .iter()
            .map(|issue| {
                vec![
                    format!("#{}", issue.id),
                    issue.summary.clone(),
                    issue.estimate.clone(),
                    issue.remaining.map(hours).unwrap_or_default(),
                    issue.overwork.map(|o| o.to_string()).unwrap_or_default(),
                ]
            })
            .collect::<Vec<_>>();

        self.add_table(header, table);
    }

    fn add_table(&mut self, header: Vec<Heading>, table: Vec<Vec<String>>) {
        let mut md_table = MarkdownTable::new(table);
        md_table.with_headings(header);

        if let Ok(table) = md_table.as_markdown() {
            self.paragraph(table);
        }
    }
}

fn metric(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.2}")
    }
}

fn percent(ratio: f64) -> String {
    if ratio.is_nan() {
        "-".to_string()
    } else {
        format!("{:.0}%", ratio * 100.0)
    }
}

fn hours(duration: Duration) -> String {
    format!("{:.1}h", duration.as_hours())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixtures::{at, day};
    use crate::analyze::Overwork;
    use crate::model::{Milestone, ProjectConfig, User};
    use tempfile::tempdir;

    fn analyzed(project: &str, name: &str) -> MilestoneAnalyzed {
        MilestoneAnalyzed {
            milestone: Milestone::new(name, project).due(at(2012, 3, 7, 17)),
            start: at(2012, 3, 5, 9),
            burndown: vec![
                (day(2012, 3, 4), Duration::hours(10.0)),
                (day(2012, 3, 5), Duration::hours(6.0)),
            ],
            completeness: 0.6,
            velocity: f64::NAN,
            average_velocity: 3.5,
            users: vec![UserAnalyzed {
                user: User::new("andy"),
                velocity: 4.0,
                current_velocity: 0.0,
                week_velocity: f64::NAN,
                hours_per_day: 4.0,
                week_hours: f64::NAN,
                logged_in_milestone: Duration::hours(4.0),
            }],
            issues: vec![IssueAnalyzed {
                id: 1,
                summary: "Burndown chart".to_string(),
                estimate: "8h".to_string(),
                remaining: Some(Duration::hours(4.0)),
                overwork: Some(Overwork::Warning),
            }],
        }
    }

    #[test]
    fn test_report_per_project() {
        let dir = tempdir().unwrap();
        let analyzed = vec![analyzed("agile", "1.0"), analyzed("web", "2.0")];

        let project = Project::new("agile", "HeadsUp Agile", ProjectConfig::new());

        let path = analyzed.report_create(&project, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("agile.md"));

        let report = fs::read_to_string(path).unwrap();
        assert!(report.contains("Time tracking: HeadsUp Agile"));
        assert!(report.contains("1.0 (05.03.2012 - 07.03.2012)"));
        assert!(!report.contains("2.0"));
        assert!(report.contains("60%"));
        assert!(report.contains("3.50"));
        assert!(report.contains("Effort remaining"));
        assert!(report.contains("**andy**"));
        assert!(report.contains("Burndown chart"));
    }

    #[test]
    fn test_metric_formatting() {
        assert_eq!(metric(f64::NAN), "-");
        assert_eq!(metric(2.5), "2.50");
        assert_eq!(percent(0.6), "60%");
        assert_eq!(hours(Duration::hours(4.0)), "4.0h");
    }
}
