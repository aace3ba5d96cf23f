//! Plain-text rendering of an [Analysis].

use std::fmt;

use itertools::Itertools;

use crate::analysis::{Analysis, TaskProfile};

/// Renders the claims found in the trace, the CPU demand of each
/// task, and both response-time analyses. Tasks are listed by name.
///
/// ```text
/// Claims:
/// EXTI1 [test000002.ktest] ceiling 3: 8..18 (10 cycles)
///
/// CPU demand:
/// EXTI1 = 37/100
/// ------------
/// sum = 281/300 (0.9367)
///
/// Response times (one-shot estimate):
/// R_EXTI1 = 105 (C: 37 - B: 0 - I: 68)
///
/// Response times (exact):
/// R_EXTI3 = 45 (C: 8 - B: 15 - I: 22) - MISSED DEADLINE
/// ```
pub struct Report<'a> {
    analysis: &'a Analysis,
}

impl<'a> Report<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Report { analysis }
    }

    fn by_name(&self) -> impl Iterator<Item = &'a TaskProfile> {
        self.analysis
            .profiles
            .iter()
            .sorted_by(|a, b| a.name().cmp(b.name()))
    }
}

impl<'a> fmt::Display for Report<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Claims:")?;
        for c in &self.analysis.claims {
            writeln!(
                f,
                "{} [{}] ceiling {}: {}..{} ({} cycles)",
                c.task,
                c.run,
                c.ceiling,
                c.entered,
                c.exited,
                c.duration()
            )?;
        }

        writeln!(f, "\nCPU demand:")?;
        for p in self.by_name() {
            writeln!(f, "{} = {}/{}", p.name(), p.wcet(), p.period())?;
        }
        writeln!(f, "------------")?;
        let total = self.analysis.utilization;
        writeln!(f, "sum = {} ({:.4})", total, total.as_f64())?;

        writeln!(f, "\nResponse times (one-shot estimate):")?;
        for p in self.by_name() {
            let e = &p.estimate;
            writeln!(
                f,
                "R_{} = {} (C: {} - B: {} - I: {})",
                p.name(),
                e.response_time,
                e.wcet,
                e.blocking,
                e.interference
            )?;
        }

        writeln!(f, "\nResponse times (exact):")?;
        for p in self.by_name() {
            write!(
                f,
                "R_{} = {} (C: {} - B: {} - I: {})",
                p.name(),
                p.response_time(),
                p.wcet(),
                p.blocking(),
                p.interference()
            )?;
            if p.deadline_missed() {
                write!(f, " - MISSED DEADLINE")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Report;
    use crate::analysis::{analyze, AnalysisConfig};
    use crate::tests::{exti_table, exti_trace};

    #[test]
    fn exti_report() {
        let analysis = analyze(
            &exti_trace(),
            &exti_table([100, 30, 40]),
            &AnalysisConfig::default(),
        )
        .unwrap();
        let report = Report::new(&analysis).to_string();
        let expected = "\
Claims:
EXTI1 [test000002.ktest] ceiling 3: 8..18 (10 cycles)
EXTI1 [test000002.ktest] ceiling 2: 5..20 (15 cycles)
EXTI2 [test000003.ktest] ceiling 3: 2..6 (4 cycles)
EXTI3 [test000004.ktest] ceiling 3: 1..5 (4 cycles)

CPU demand:
EXTI1 = 37/100
EXTI2 = 11/30
EXTI3 = 8/40
------------
sum = 281/300 (0.9367)

Response times (one-shot estimate):
R_EXTI1 = 105 (C: 37 - B: 0 - I: 68)
R_EXTI2 = 21 (C: 11 - B: 10 - I: 0)
R_EXTI3 = 45 (C: 8 - B: 15 - I: 22)

Response times (exact):
R_EXTI1 = 94 (C: 37 - B: 0 - I: 57)
R_EXTI2 = 21 (C: 11 - B: 10 - I: 0)
R_EXTI3 = 45 (C: 8 - B: 15 - I: 22) - MISSED DEADLINE
";
        assert_eq!(report, expected);
    }
}
