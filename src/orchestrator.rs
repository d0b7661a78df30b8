// ==============================================================================
// orchestrator.rs - Plot Generation Pipeline
// ==============================================================================
// Description: Discovers inputs, runs every plot task and collects outcomes
// Author: Matt Barham
// Created: 2026-10-19
// Modified: 2026-10-19
// Version: 1.0.0
// ==============================================================================
// Tasks are independent. A missing input skips its task; a failing task is
// recorded and the run continues with the next one.
// ==============================================================================

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::{Analysis, PlotConfig};
use crate::models::TopHit;
use crate::plots::PlotRenderer;

pub const PCA_OUTPUT: &str = "pca_plot.png";
pub const MISSINGNESS_OUTPUT: &str = "missingness_plots.png";

/// One unit of plotting work
#[derive(Debug, Clone, PartialEq)]
pub enum PlotTask {
    Manhattan {
        analysis: Analysis,
        input: PathBuf,
        output: PathBuf,
    },
    Qq {
        analysis: Analysis,
        input: PathBuf,
        output: PathBuf,
    },
    Pca {
        input: PathBuf,
        output: PathBuf,
    },
    Missingness {
        lmiss: PathBuf,
        imiss: PathBuf,
        output: PathBuf,
    },
}

impl PlotTask {
    pub fn name(&self) -> String {
        match self {
            PlotTask::Manhattan { analysis, .. } => format!("Manhattan plot ({})", analysis.label),
            PlotTask::Qq { analysis, .. } => format!("Q-Q plot ({})", analysis.label),
            PlotTask::Pca { .. } => "PCA plot".to_string(),
            PlotTask::Missingness { .. } => "Missingness plots".to_string(),
        }
    }

    pub fn output(&self) -> &Path {
        match self {
            PlotTask::Manhattan { output, .. }
            | PlotTask::Qq { output, .. }
            | PlotTask::Pca { output, .. }
            | PlotTask::Missingness { output, .. } => output,
        }
    }
}

/// What a successful task produced besides its image
#[derive(Debug, Clone, PartialEq)]
pub enum TaskDetail {
    TopHits(Vec<TopHit>),
    Lambda(f64),
    Written,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Succeeded(TaskDetail),
    /// Error chain rendered as text
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskResult {
    pub name: String,
    pub output: PathBuf,
    pub outcome: TaskOutcome,
}

impl TaskResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, TaskOutcome::Succeeded(_))
    }
}

/// Outcomes of one plotting run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub results: Vec<TaskResult>,
    /// Inputs that were not found
    pub skipped: Vec<PathBuf>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            match &result.outcome {
                TaskOutcome::Succeeded(detail) => {
                    writeln!(f, "[OK]     {} -> {}", result.name, result.output.display())?;
                    match detail {
                        TaskDetail::TopHits(hits) => {
                            writeln!(f, "         Top SNPs:")?;
                            writeln!(f, "         {:>4} {:>15} {:>12} {:>12}", "CHR", "SNP", "BP", "P")?;
                            for hit in hits {
                                writeln!(f, "         {}", hit)?;
                            }
                        }
                        TaskDetail::Lambda(lambda) => {
                            writeln!(f, "         Genomic inflation factor (λ): {:.3}", lambda)?;
                        }
                        TaskDetail::Written => {}
                    }
                }
                TaskOutcome::Failed(message) => {
                    writeln!(f, "[FAILED] {}: {}", result.name, message)?;
                }
            }
        }
        for path in &self.skipped {
            writeln!(f, "[SKIP]   {} (not found)", path.display())?;
        }
        write!(
            f,
            "{} succeeded, {} failed, {} skipped",
            self.succeeded(),
            self.failed(),
            self.skipped.len()
        )
    }
}

/// Runs every plot task against a renderer
pub struct PlotGenerator<R: PlotRenderer> {
    renderer: R,
    config: PlotConfig,
}

impl<R: PlotRenderer> PlotGenerator<R> {
    pub fn new(renderer: R, config: PlotConfig) -> Self {
        Self { renderer, config }
    }

    /// Build the task list from the inputs that exist
    ///
    /// Returns the tasks in run order and the expected inputs that are missing.
    pub fn plan(&self, assoc_dir: &Path, qc_dir: &Path, output_dir: &Path) -> (Vec<PlotTask>, Vec<PathBuf>) {
        let mut tasks = Vec::new();
        let mut skipped = Vec::new();

        for analysis in &self.config.analyses {
            let input = assoc_dir.join(&analysis.file_name);
            if !input.is_file() {
                debug!("Association file not found, skipping: {:?}", input);
                skipped.push(input);
                continue;
            }

            let slug = analysis.slug();
            tasks.push(PlotTask::Manhattan {
                analysis: analysis.clone(),
                input: input.clone(),
                output: output_dir.join(format!("manhattan_plot_{}.png", slug)),
            });
            tasks.push(PlotTask::Qq {
                analysis: analysis.clone(),
                input,
                output: output_dir.join(format!("qq_plot_{}.png", slug)),
            });
        }

        let pca = qc_dir.join(&self.config.pca_file);
        if pca.is_file() {
            tasks.push(PlotTask::Pca {
                input: pca,
                output: output_dir.join(PCA_OUTPUT),
            });
        } else {
            debug!("PCA file not found, skipping: {:?}", pca);
            skipped.push(pca);
        }

        let lmiss = qc_dir.join(&self.config.lmiss_file);
        let imiss = qc_dir.join(&self.config.imiss_file);
        match (lmiss.is_file(), imiss.is_file()) {
            (true, true) => tasks.push(PlotTask::Missingness {
                lmiss,
                imiss,
                output: output_dir.join(MISSINGNESS_OUTPUT),
            }),
            (lmiss_found, imiss_found) => {
                debug!("Missingness reports incomplete, skipping missingness plots");
                if !lmiss_found {
                    skipped.push(lmiss);
                }
                if !imiss_found {
                    skipped.push(imiss);
                }
            }
        }

        (tasks, skipped)
    }

    /// Plan and run every task
    ///
    /// Fails only when the output directory cannot be created; task failures
    /// are recorded in the report.
    pub fn run(&self, assoc_dir: &Path, qc_dir: &Path, output_dir: &Path) -> Result<RunReport> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

        let (tasks, skipped) = self.plan(assoc_dir, qc_dir, output_dir);
        info!("Planned {} plot tasks ({} inputs missing)", tasks.len(), skipped.len());

        let results = tasks
            .iter()
            .map(|task| {
                info!("--- {} ---", task.name());
                let outcome = match self.run_task(task) {
                    Ok(detail) => TaskOutcome::Succeeded(detail),
                    Err(e) => {
                        error!("Error creating {}: {:#}", task.name(), e);
                        TaskOutcome::Failed(format!("{:#}", e))
                    }
                };
                TaskResult {
                    name: task.name(),
                    output: task.output().to_path_buf(),
                    outcome,
                }
            })
            .collect();

        let report = RunReport { results, skipped };
        info!(
            "Visualization complete: {} succeeded, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }

    fn run_task(&self, task: &PlotTask) -> Result<TaskDetail> {
        match task {
            PlotTask::Manhattan {
                analysis,
                input,
                output,
            } => {
                let title = format!("Manhattan Plot ({})", analysis.label);
                let hits = self.renderer.manhattan(input, output, &title)?;
                Ok(TaskDetail::TopHits(hits))
            }
            PlotTask::Qq {
                analysis,
                input,
                output,
            } => {
                let title = format!("Q-Q Plot ({})", analysis.label);
                let lambda = self.renderer.qq(input, output, &title)?;
                info!("Genomic inflation factor (λ): {:.3}", lambda);
                Ok(TaskDetail::Lambda(lambda))
            }
            PlotTask::Pca { input, output } => {
                self.renderer.pca(input, output)?;
                Ok(TaskDetail::Written)
            }
            PlotTask::Missingness {
                lmiss,
                imiss,
                output,
            } => {
                self.renderer.missingness(lmiss, imiss, output)?;
                Ok(TaskDetail::Written)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_IMISS_FILE, DEFAULT_LMISS_FILE, DEFAULT_PCA_FILE};
    use crate::stats::GenomicControl;
    use std::cell::RefCell;
    use tempfile::tempdir;

    /// Records calls instead of drawing; fails any call whose output name
    /// contains one of `fail_on`. With `real_qq` the Q-Q call runs the PNG
    /// renderer's parsing and lambda steps.
    #[derive(Default)]
    struct FakeRenderer {
        calls: RefCell<Vec<String>>,
        fail_on: Vec<&'static str>,
        real_qq: bool,
    }

    impl FakeRenderer {
        fn record(&self, kind: &str, output: &Path) -> Result<()> {
            let name = output.file_name().unwrap().to_string_lossy().to_string();
            self.calls.borrow_mut().push(format!("{}:{}", kind, name));
            if self.fail_on.iter().any(|f| name.contains(f)) {
                anyhow::bail!("injected failure for {}", name);
            }
            Ok(())
        }
    }

    impl PlotRenderer for &FakeRenderer {
        fn manhattan(&self, _assoc: &Path, output: &Path, _title: &str) -> Result<Vec<TopHit>> {
            self.record("manhattan", output)?;
            Ok(vec![TopHit {
                chromosome: "1".to_string(),
                snp: "rs1".to_string(),
                position: 100,
                p_value: 1e-9,
            }])
        }

        fn qq(&self, assoc: &Path, output: &Path, title: &str) -> Result<f64> {
            self.record("qq", output)?;
            if self.real_qq {
                return crate::plots::qq::render(assoc, output, title, 72, &GenomicControl::default());
            }
            Ok(1.02)
        }

        fn pca(&self, _eigenvec: &Path, output: &Path) -> Result<()> {
            self.record("pca", output)
        }

        fn missingness(&self, _lmiss: &Path, _imiss: &Path, output: &Path) -> Result<()> {
            self.record("missingness", output)
        }
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_only_with_qc_present() {
        let assoc = tempdir().unwrap();
        let qc = tempdir().unwrap();
        let out = tempdir().unwrap();
        touch(assoc.path(), "AA_GWAS_hg19_uniq_assoc_withQC.assoc");

        let renderer = FakeRenderer::default();
        let generator = PlotGenerator::new(&renderer, PlotConfig::default());
        let report = generator.run(assoc.path(), qc.path(), out.path()).unwrap();

        assert_eq!(
            *renderer.calls.borrow(),
            vec![
                "manhattan:manhattan_plot_with_qc.png".to_string(),
                "qq:qq_plot_with_qc.png".to_string(),
            ]
        );
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 0);
        // noQC, standard, pca, lmiss, imiss
        assert_eq!(report.skipped.len(), 5);
    }

    #[test]
    fn test_failing_task_does_not_stop_run() {
        let assoc = tempdir().unwrap();
        let qc = tempdir().unwrap();
        let out = tempdir().unwrap();
        touch(assoc.path(), "AA_GWAS_hg19_uniq_assoc_noQC.assoc");
        touch(assoc.path(), "AA_GWAS_hg19_uniq_assoc.assoc");
        touch(qc.path(), DEFAULT_PCA_FILE);
        touch(qc.path(), DEFAULT_LMISS_FILE);
        touch(qc.path(), DEFAULT_IMISS_FILE);

        let renderer = FakeRenderer {
            fail_on: vec!["manhattan_plot_no_qc", "pca_plot"],
            ..FakeRenderer::default()
        };
        let generator = PlotGenerator::new(&renderer, PlotConfig::default());
        let report = generator.run(assoc.path(), qc.path(), out.path()).unwrap();

        assert_eq!(renderer.calls.borrow().len(), 6);
        assert_eq!(report.results.len(), 6);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.succeeded(), 4);

        let failed: Vec<&str> = report
            .results
            .iter()
            .filter(|r| !r.is_success())
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(failed, vec!["Manhattan plot (No QC)", "PCA plot"]);

        let last = report.results.last().unwrap();
        assert_eq!(last.outcome, TaskOutcome::Succeeded(TaskDetail::Written));
        assert!(last.output.ends_with(MISSINGNESS_OUTPUT));
    }

    #[test]
    fn test_out_of_range_p_fails_only_its_task() {
        let assoc = tempdir().unwrap();
        let qc = tempdir().unwrap();
        let out = tempdir().unwrap();
        std::fs::write(
            assoc.path().join("AA_GWAS_hg19_uniq_assoc_withQC.assoc"),
            "CHR SNP BP P\n1 rs1 10 3.0\n1 rs2 20 2.5\n1 rs3 30 0.01\n",
        )
        .unwrap();
        touch(qc.path(), DEFAULT_PCA_FILE);

        let renderer = FakeRenderer {
            real_qq: true,
            ..FakeRenderer::default()
        };
        let generator = PlotGenerator::new(&renderer, PlotConfig::default());
        let report = generator.run(assoc.path(), qc.path(), out.path()).unwrap();

        let calls = renderer.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[2], "pca:pca_plot.png");
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 2);

        let qq = &report.results[1];
        assert_eq!(qq.name, "Q-Q plot (With QC)");
        match &qq.outcome {
            TaskOutcome::Failed(reason) => assert!(reason.contains("outside (0, 1]"), "{}", reason),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missingness_needs_both_reports() {
        let assoc = tempdir().unwrap();
        let qc = tempdir().unwrap();
        touch(qc.path(), DEFAULT_LMISS_FILE);

        let renderer = FakeRenderer::default();
        let generator = PlotGenerator::new(&renderer, PlotConfig::default());
        let (tasks, skipped) = generator.plan(assoc.path(), qc.path(), Path::new("out"));

        assert!(tasks.is_empty());
        assert!(skipped.contains(&qc.path().join(DEFAULT_IMISS_FILE)));
        assert!(!skipped.contains(&qc.path().join(DEFAULT_LMISS_FILE)));
    }

    #[test]
    fn test_custom_analyses() {
        let assoc = tempdir().unwrap();
        let qc = tempdir().unwrap();
        touch(assoc.path(), "cohort2.assoc.logistic");

        let config = PlotConfig {
            analyses: vec![Analysis::new("cohort2.assoc.logistic", "Cohort Two")],
            ..PlotConfig::default()
        };
        let renderer = FakeRenderer::default();
        let generator = PlotGenerator::new(&renderer, config);
        let (tasks, _) = generator.plan(assoc.path(), qc.path(), Path::new("out"));

        let outputs: Vec<&Path> = tasks.iter().map(PlotTask::output).collect();
        assert_eq!(
            outputs,
            vec![
                Path::new("out/manhattan_plot_cohort_two.png"),
                Path::new("out/qq_plot_cohort_two.png"),
            ]
        );
    }

    #[test]
    fn test_creates_output_directory() {
        let assoc = tempdir().unwrap();
        let qc = tempdir().unwrap();
        let base = tempdir().unwrap();
        let out = base.path().join("nested").join("plots");

        let renderer = FakeRenderer::default();
        let report = PlotGenerator::new(&renderer, PlotConfig::default())
            .run(assoc.path(), qc.path(), &out)
            .unwrap();

        assert!(out.is_dir());
        assert!(report.results.is_empty());
    }

    #[test]
    fn test_report_display() {
        let report = RunReport {
            results: vec![
                TaskResult {
                    name: "Q-Q plot (With QC)".to_string(),
                    output: PathBuf::from("qq_plot_with_qc.png"),
                    outcome: TaskOutcome::Succeeded(TaskDetail::Lambda(1.0234)),
                },
                TaskResult {
                    name: "PCA plot".to_string(),
                    output: PathBuf::from("pca_plot.png"),
                    outcome: TaskOutcome::Failed("bad file".to_string()),
                },
            ],
            skipped: vec![PathBuf::from("missing.assoc")],
        };

        let text = report.to_string();
        assert!(text.contains("λ): 1.023"));
        assert!(text.contains("[FAILED] PCA plot: bad file"));
        assert!(text.contains("[SKIP]   missing.assoc"));
        assert!(text.ends_with("1 succeeded, 1 failed, 1 skipped"));
    }
}
