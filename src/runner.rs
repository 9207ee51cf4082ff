//! The run harness and the sweep driver.
//!
//! The runner owns the state context and the per-iteration action list. Only
//! one test runs at a time; the current-state bookkeeping is bracketed
//! around each run and never touched mid-iteration.

use std::io::Write;

use anyhow::Result;

use gl;
use result::ResultSet;
use state::StateContext;
use surface::Surface;
use test::{Action, RunOutcome, Test};
use timer::Timer;

pub struct Runner<'a> {
    surface: &'a mut Surface,
    ctx: StateContext,
    actions: Vec<Box<Action>>,
}

impl<'a> Runner<'a> {
    pub fn new(surface: &'a mut Surface) -> Runner<'a> {
        Runner {
            surface: surface,
            ctx: StateContext::new(),
            actions: Vec::new(),
        }
    }

    pub fn add_action(&mut self, action: Box<Action>) {
        self.actions.push(action);
    }

    /// Runs one test for `run_for` seconds and returns its normalized
    /// results. `teardown` executes on every exit path, including a failed
    /// `setup`, and its own failure is logged and swallowed so it can never
    /// mask the original error.
    pub fn run(&mut self, test: &mut Test, run_for: f64) -> RunOutcome {
        if !test.supported() {
            return RunOutcome::Unsupported;
        }

        let previous = self.ctx.apply(test.state_set());
        let pushed = match test.transform() {
            Some(matrix) => {
                unsafe {
                    gl::PushMatrix();
                    gl::LoadMatrixf(matrix.as_ptr());
                }
                true
            }
            None => false,
        };

        let outcome = self.timed_loop(test, run_for);

        if let Err(e) = test.teardown() {
            warn!("{}: teardown failed: {:#}", test.name(), e);
        }
        if pushed {
            unsafe {
                gl::PopMatrix();
            }
        }
        self.ctx.apply(previous.as_ref());

        match outcome {
            Ok(results) => RunOutcome::Completed(results),
            Err(e) => RunOutcome::Failed(e),
        }
    }

    fn timed_loop(&mut self, test: &mut Test, run_for: f64) -> Result<ResultSet> {
        test.setup()?;

        let mut results = ResultSet::new(test.descs().len());

        // Setup cost stays outside the measured interval, and the interval
        // ends only once the submitted work has actually completed.
        self.surface.finish();
        let timer = Timer::new();
        while timer.elapsed() < run_for {
            for action in &mut self.actions {
                action.execute();
            }
            test.iterate(&mut results)?;
            self.surface.pump_events();
        }
        self.surface.finish();

        results.normalize(timer.elapsed());
        Ok(results)
    }

    /// Single-pass sweep: each test sampled once, one output row.
    pub fn run_tests(
        &mut self,
        out: &mut Write,
        mut tests: Vec<Box<Test>>,
        run_for: f64,
        dep_var: &str,
    ) -> Result<()> {
        for test in &mut tests {
            self.between_tests()?;
            self.sample(out, test.as_mut(), run_for, dep_var)?;
        }
        writeln!(out)?;
        Ok(())
    }

    /// Ranged sweep: for every value of the independent variable, every test
    /// is configured and sampled; one output row per value, one column per
    /// test in list order.
    pub fn run_tests_range<R>(
        &mut self,
        out: &mut Write,
        mut tests: Vec<Box<Test>>,
        run_for: f64,
        dep_var: &str,
        ind_var: &str,
        range: R,
    ) -> Result<()>
    where
        R: Iterator<Item = u64>,
    {
        for value in range {
            for test in &mut tests {
                self.between_tests()?;
                test.set_property(ind_var, value)?;
                self.sample(out, test.as_mut(), run_for, dep_var)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn sample(
        &mut self,
        out: &mut Write,
        test: &mut Test,
        run_for: f64,
        dep_var: &str,
    ) -> Result<()> {
        match self.run(test, run_for) {
            RunOutcome::Completed(results) => {
                let descs = test.descs();
                let index = descs
                    .iter()
                    .position(|desc| desc.name == dep_var)
                    .ok_or_else(|| {
                        anyhow!("{}: no result named '{}'", test.name(), dep_var)
                    })?;
                info!(
                    "  {}: {} = {} {}",
                    test.name(),
                    descs[index].name,
                    results[index] as u64,
                    descs[index].units,
                );
                write!(out, "{} ", results[index])?;
            }
            RunOutcome::Unsupported => {
                write!(out, "0 ")?;
            }
            RunOutcome::Failed(e) => {
                error!("{}: failed: {:#}", test.name(), e);
                return Err(e.context(format!("test '{}' failed", test.name())));
            }
        }
        Ok(())
    }

    /// Resets the display between samples so driver-side batching from one
    /// test cannot bleed into the next measurement.
    fn between_tests(&mut self) -> Result<()> {
        self.surface.clear();
        self.surface.pump_events();
        self.surface.swap()
    }
}
