use crate::report::PressureReport;
use crate::sim::Simulation;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::stepper::Termination;
use colored::Colorize;

/// Progress Reporter Operator
///
/// Prints relaxation progress at a fixed iteration interval and a summary
/// of the finished run. Optionally prints the final depth profile.
#[derive(Debug, Clone)]
pub struct ProgressReporterOp {
    pub name: String,
    pub report_interval: usize, // Report every N iterations
    pub show_profile: bool,     // Print the depth profile table after the run
}

impl ProgressReporterOp {
    pub fn new(report_interval: usize) -> Self {
        Self::new_with_options(report_interval, false)
    }

    pub fn new_with_options(report_interval: usize, show_profile: bool) -> Self {
        Self {
            name: "ProgressReporterOp".to_string(),
            report_interval: report_interval.max(1),
            show_profile,
        }
    }

    pub fn handle(report_interval: usize) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new(report_interval)))
    }

    pub fn handle_with_options(report_interval: usize, show_profile: bool) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new_with_options(report_interval, show_profile)))
    }

    fn progress_line(&self, sim: &Simulation) -> String {
        format!(
            "   Iteration {:>7}: t = {:>8.3} yr, max |P*/P_steady| = {:.3e}",
            sim.current_step(),
            sim.elapsed_years(),
            sim.stepper.max_relative_overpressure()
        )
    }

    fn print_profile(&self, report: &PressureReport) {
        println!(
            "   {:>8} {:>12} {:>12} {:>12} {:>12} {:>11} {:>8}",
            "depth m", "initial MPa", "snapshot MPa", "final MPa", "steady MPa", "k m²", "phi"
        );
        for row in report.profile_rows() {
            let snapshot = row
                .snapshot_pa
                .map(|p| format!("{:>12.4}", p / 1e6))
                .unwrap_or_else(|| format!("{:>12}", "-"));
            println!(
                "   {:>8.1} {:>12.4} {} {:>12.4} {:>12.4} {:>11.3e} {:>8.4}",
                row.depth_m,
                row.initial_pa / 1e6,
                snapshot,
                row.final_pa / 1e6,
                row.steady_pa / 1e6,
                row.permeability_m2,
                row.porosity
            );
        }
    }
}

/// Human-readable span of simulated time
pub fn format_time_span(years: f64) -> String {
    if years >= 1_000.0 {
        format!("{:.1} thousand years", years / 1_000.0)
    } else if years >= 1.0 {
        format!("{:.2} years", years)
    } else {
        format!("{:.1} days", years * 365.0)
    }
}

impl SimOp for ProgressReporterOp {
    fn name(&self) -> &str {
        &self.name
    }

    fn init_sim(&mut self, sim: &Simulation) {
        println!("🌊 Starting pore-pressure relaxation: {}", sim.name.bold());
        println!(
            "   Seafloor {:.0} m -> {:.0} m, {} nodes at {:.1} m",
            sim.config.seafloor_depth_m,
            sim.config.new_seafloor_depth_m,
            sim.column.len(),
            sim.column.dz
        );
        println!(
            "   alpha = {:.3e} m²/s, dt = {:.0} s, courant = {:.3}",
            sim.stability.alpha,
            sim.stability.dt_seconds,
            sim.stability.courant_number()
        );
    }

    fn update_sim(&mut self, sim: &Simulation) {
        if sim.current_step() % self.report_interval == 0 {
            println!("{}", self.progress_line(sim));
        }
    }

    fn after_sim(&mut self, _sim: &Simulation, report: &PressureReport) {
        println!();
        match report.termination {
            Termination::Converged => {
                println!("{}", "📈 Pressure profile relaxed".green().bold())
            }
            Termination::BudgetExhausted => println!(
                "{}",
                "⚠️  Iteration budget exhausted before convergence".yellow().bold()
            ),
        }
        println!("   Iterations: {}", report.iterations);
        println!("   Simulated time span: {}", format_time_span(report.elapsed_years));
        match &report.snapshot {
            Some(snapshot) => println!(
                "   Snapshot captured at iteration {} ({})",
                snapshot.iteration,
                format_time_span(snapshot.elapsed_years)
            ),
            None => println!("   {}", "Snapshot not captured".yellow()),
        }

        if self.show_profile {
            println!();
            self.print_profile(report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PressureConfig;
    use crate::sim::SimProps;

    #[test]
    fn test_progress_reporter_creation() {
        let reporter = ProgressReporterOp::new(10);
        assert_eq!(reporter.report_interval, 10);
        assert!(!reporter.show_profile);
        assert_eq!(reporter.name(), "ProgressReporterOp");
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let reporter = ProgressReporterOp::new_with_options(0, true);
        assert_eq!(reporter.report_interval, 1);
        assert!(reporter.show_profile);
    }

    #[test]
    fn test_format_time_span() {
        assert_eq!(format_time_span(0.5), "182.5 days");
        assert_eq!(format_time_span(5.0), "5.00 years");
        assert_eq!(format_time_span(2500.0), "2.5 thousand years");
    }

    #[test]
    fn test_progress_line_reports_iteration() {
        let mut sim = Simulation::new(SimProps {
            name: "progress_test",
            config: PressureConfig::default(),
            ops: vec![],
        })
        .unwrap();
        sim.stepper.advance();
        let line = ProgressReporterOp::new(1).progress_line(&sim);
        assert!(line.contains("Iteration       1"));
    }

    #[test]
    fn test_reporter_runs_inside_simulation() {
        let sim = Simulation::new(SimProps {
            name: "reporter_run",
            config: PressureConfig {
                max_iterations: 20,
                ..PressureConfig::default()
            },
            ops: vec![ProgressReporterOp::handle_with_options(5, true)],
        })
        .unwrap();
        let report = sim.run();
        assert_eq!(report.iterations, 20);
    }
}
