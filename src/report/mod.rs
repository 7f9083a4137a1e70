use crate::explorer::RunStatistics;

/// output flavors for a statistics report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Markdown,
    Json,
}

/// knobs for the rendered report
#[derive(Debug, Clone)]
pub struct Options {
    pub detailed: bool,
    pub include_histograms: bool,
    pub max_label_rows: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            detailed: false,
            include_histograms: false,
            max_label_rows: 10,
        }
    }
}

/// renders a run's statistics for humans (text, markdown) or for
/// machines (json, straight off the serialized statistics).
pub struct Reporter;

impl Reporter {
    pub fn format(statistics: &RunStatistics, format: Format, options: &Options) -> String {
        match format {
            Format::Text => Self::text(statistics, options),
            Format::Markdown => Self::markdown(statistics, options),
            Format::Json => {
                serde_json::to_string_pretty(statistics).expect("statistics serialize")
            }
        }
    }

    fn percentage(count: usize, total: usize) -> f64 {
        match total {
            0 => 0.,
            total => 100. * count as f64 / total as f64,
        }
    }

    fn text(statistics: &RunStatistics, options: &Options) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "tests: {} run, {} passed, {} discarded\n",
            statistics.tests_run, statistics.tests_passed, statistics.tests_discarded
        ));
        if options.detailed {
            if let Some(confidence) = statistics.confidence {
                out.push_str(&format!(
                    "confidence: {:.4} after {} checks{}\n",
                    confidence,
                    statistics.confidence_checks,
                    match statistics.early_termination {
                        true => " (stopped early)",
                        false => "",
                    }
                ));
            }
            if statistics.timed_out {
                out.push_str("deadline: reached\n");
            }
            if statistics.shrink_attempts > 0 {
                out.push_str(&format!(
                    "shrinking: {} attempts over {} rounds\n",
                    statistics.shrink_attempts, statistics.shrink_rounds
                ));
            }
        }
        if !statistics.events.is_empty() {
            out.push_str("events:\n");
            for (name, count) in statistics.events.iter().take(options.max_label_rows) {
                out.push_str(&format!(
                    " ├─{}: {} ({:.1}%)\n",
                    name,
                    count,
                    Self::percentage(*count, statistics.tests_run)
                ));
            }
        }
        if !statistics.targets.is_empty() {
            out.push_str("targets:\n");
            for (label, target) in statistics.targets.iter().take(options.max_label_rows) {
                out.push_str(&format!(
                    " ├─{}: n={} mean={:.3} sd={:.3} min={:.3} p25={:.3} p50={:.3} p75={:.3} max={:.3}\n",
                    label,
                    target.count,
                    target.mean,
                    target.stddev,
                    target.min,
                    target.p25,
                    target.p50,
                    target.p75,
                    target.max,
                ));
            }
        }
        if options.include_histograms && !statistics.distributions.is_empty() {
            out.push_str("distributions:\n");
            for (name, histogram) in statistics.distributions.iter().take(options.max_label_rows) {
                out.push_str(&format!(" ├─{}: {}\n", name, Self::bars(&histogram.counts())));
            }
        }
        out
    }

    fn markdown(statistics: &RunStatistics, options: &Options) -> String {
        let mut out = String::new();
        out.push_str("| metric | value |\n|---|---|\n");
        out.push_str(&format!("| tests run | {} |\n", statistics.tests_run));
        out.push_str(&format!("| tests passed | {} |\n", statistics.tests_passed));
        out.push_str(&format!(
            "| tests discarded | {} |\n",
            statistics.tests_discarded
        ));
        if options.detailed {
            if let Some(confidence) = statistics.confidence {
                out.push_str(&format!("| confidence | {:.4} |\n", confidence));
            }
            out.push_str(&format!(
                "| early termination | {} |\n",
                statistics.early_termination
            ));
        }
        if !statistics.events.is_empty() {
            out.push_str("\n| event | count | share |\n|---|---|---|\n");
            for (name, count) in statistics.events.iter().take(options.max_label_rows) {
                out.push_str(&format!(
                    "| {} | {} | {:.1}% |\n",
                    name,
                    count,
                    Self::percentage(*count, statistics.tests_run)
                ));
            }
        }
        if !statistics.targets.is_empty() {
            out.push_str("\n| target | n | mean | sd | min | p50 | max |\n|---|---|---|---|---|---|---|\n");
            for (label, target) in statistics.targets.iter().take(options.max_label_rows) {
                out.push_str(&format!(
                    "| {} | {} | {:.3} | {:.3} | {:.3} | {:.3} | {:.3} |\n",
                    label, target.count, target.mean, target.stddev, target.min, target.p50,
                    target.max,
                ));
            }
        }
        if options.include_histograms && !statistics.distributions.is_empty() {
            out.push_str("\n| quantifier | histogram |\n|---|---|\n");
            for (name, histogram) in statistics.distributions.iter().take(options.max_label_rows) {
                out.push_str(&format!("| {} | `{}` |\n", name, Self::bars(&histogram.counts())));
            }
        }
        out
    }

    /// a compact unicode sparkline over bin counts
    fn bars(counts: &[usize]) -> String {
        const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        let peak = counts.iter().copied().max().unwrap_or(0).max(1);
        counts
            .iter()
            .map(|&c| LEVELS[(c * (LEVELS.len() - 1)) / peak])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::TargetSummary;

    fn sample_statistics() -> RunStatistics {
        let mut statistics = RunStatistics {
            tests_run: 200,
            tests_passed: 180,
            tests_discarded: 20,
            confidence: Some(0.97),
            confidence_checks: 2,
            early_termination: true,
            ..RunStatistics::default()
        };
        statistics.events.insert("small".to_string(), 50);
        statistics.targets.insert(
            "len".to_string(),
            TargetSummary {
                count: 200,
                mean: 5.,
                stddev: 1.5,
                min: 0.,
                max: 10.,
                p25: 4.,
                p50: 5.,
                p75: 6.,
            },
        );
        statistics
    }

    #[test]
    fn text_report_mentions_counts_and_shares() {
        let report = Reporter::format(&sample_statistics(), Format::Text, &Options::default());
        assert!(report.contains("200 run"));
        assert!(report.contains("small: 50 (25.0%)"));
        assert!(report.contains("len: n=200"));
    }

    #[test]
    fn detailed_text_includes_confidence() {
        let options = Options {
            detailed: true,
            ..Options::default()
        };
        let report = Reporter::format(&sample_statistics(), Format::Text, &options);
        assert!(report.contains("confidence: 0.9700"));
        assert!(report.contains("stopped early"));
    }

    #[test]
    fn markdown_report_is_tabular() {
        let report = Reporter::format(&sample_statistics(), Format::Markdown, &Options::default());
        assert!(report.contains("| tests run | 200 |"));
        assert!(report.contains("| small | 50 | 25.0% |"));
    }

    #[test]
    fn json_report_round_trips() {
        let report = Reporter::format(&sample_statistics(), Format::Json, &Options::default());
        let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();
        assert!(parsed["tests_run"] == 200);
        assert!(parsed["events"]["small"] == 50);
    }

    #[test]
    fn label_rows_are_capped() {
        let mut statistics = sample_statistics();
        for i in 0..50 {
            statistics.events.insert(format!("event{:02}", i), 1);
        }
        let options = Options {
            max_label_rows: 5,
            ..Options::default()
        };
        let report = Reporter::format(&statistics, Format::Text, &options);
        assert!(report.matches("├─").count() == 5 + 1);
    }
}
