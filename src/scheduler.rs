//! The discrete-event coordinator: cooperative workers, phase barriers, and
//! simulated time.
//!
//! Each module, initializer, and sensitivity clause gets its own worker
//! thread communicating with the coordinator over typed `mpsc` channels —
//! the translation of `original_source/simulator.go`'s goroutines-and-
//! channels design into `std::thread`, per spec's own design note on
//! concurrency primitive substitution. A procedural body is an ordinary
//! sequential closure; [`BlockContext::delay`] suspends its own worker
//! thread on the inbound channel rather than requiring the body to be
//! written as an explicit state machine.

use std::sync::{
    mpsc::{
        self,
        Receiver,
        Sender,
    },
    Arc,
    Mutex,
};
use std::thread::{
    self,
    JoinHandle,
};

use crate::{
    error::{
        SimError,
        SimResult,
    },
    module::{
        ClauseBody,
        InitializerBody,
        Module,
        ModuleWorkerSpec,
    },
    sensitivity::SensitivityClause,
    signal::{
        RegisterHandle,
        WireHandle,
    },
};

/// What a procedural body reports when it returns normally (as opposed to
/// returning a [`SimError`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyOutcome {
    /// The body did its work for this activation and returned normally.
    Progress,
    /// The body is signaling `$finish`: the scheduler tears the run down
    /// in orderly fashion after completing the current barrier.
    Finish,
}

/// What a procedural body returns: either an outcome, or a [`SimError`]
/// that becomes a logged `BlockError` without aborting the simulation.
pub type BodyResult = SimResult<BodyOutcome>;

/// The scheduler's lifecycle states (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No timescale/precision configured yet.
    Uninitialized,
    /// Configured via [`Scheduler::initialize`]; modules may be registered.
    Initialized,
    /// Inside [`Scheduler::run`].
    Running,
    /// `run` has returned.
    Finished,
}

/// Coordinator-to-block-worker message.
enum BlockCmd {
    /// Re-evaluate (sensitivity) or resume (delay) and run.
    Run,
    /// Hard cancellation; the worker must unwind and stop.
    Finish,
}

/// Block-worker-to-coordinator message (the `{BlockProgress, BlockWait,
/// BlockComplete, DelayWait, SimFinish}` set of spec §4.5b, plus
/// `BlockError` for §4.6).
enum BlockReply {
    /// The body ran and returned normally; remains in the active set.
    Progress,
    /// A sensitivity clause's predicate did not match; remains active.
    Wait,
    /// An initializer finished; removed from the active set.
    Complete,
    /// The body is suspended in [`BlockContext::delay`]; remains active.
    DelayWait,
    /// The body signaled finish; removed from the active set.
    Finish,
    /// The body returned an error; logged, removed from the active set.
    Error(SimError),
}

/// Coordinator-to-module-worker message.
enum ModuleCmd {
    /// Commit every owned register's pending write (spec §4.3).
    UpdateRegisters,
    /// Recompute every owned wire from its drivers (spec §4.1/§4.3).
    PropagateWireValues,
    /// Hard cancellation.
    Finish,
}

/// Module-worker-to-coordinator acknowledgement.
enum ModuleReply {
    RegisterUpdateComplete,
    WirePropagateComplete,
}

/// The context a procedural body runs with: the only way it observes
/// simulated time or suspends itself.
///
/// Exposed to initializer and sensitivity-clause bodies as the argument to
/// the closure passed to [`crate::module::Module::add_initializer`] /
/// [`crate::module::Module::add_sensitivity_clause`]. Signal reads/writes
/// go directly through the [`crate::signal::RegisterHandle`]/
/// [`crate::signal::WireHandle`] values the body closure captures, not
/// through this type.
pub struct BlockContext {
    sim_time: Arc<Mutex<u64>>,
    timescale: f64,
    precision: f64,
    data: Arc<Mutex<Option<u64>>>,
    cmd_rx: Receiver<BlockCmd>,
    reply_tx: Sender<BlockReply>,
}

impl BlockContext {
    /// The coordinator's current simulated time, in precision-unit ticks.
    pub fn sim_time(&self) -> u64 {
        *self.sim_time.lock().expect("sim_time mutex poisoned")
    }

    /// Suspend this body for `seconds` (in timescale units) of simulated
    /// time, per spec §4.5's `Delay` primitive.
    ///
    /// `targetTime = simTime + round(seconds * timescale / precision)`. If
    /// that target is already reached, returns immediately without
    /// touching the channel. Otherwise it publishes the target as this
    /// worker's `data` slot, replies `DelayWait`, and blocks on the next
    /// `BlockRun` to re-check — repeating until `simTime >= targetTime`.
    /// Returns [`SimError::Aborted`] if a `SimFinish` cancellation arrives
    /// while suspended.
    pub fn delay(&mut self, seconds: f64) -> SimResult<()> {
        let ticks = (seconds * self.timescale / self.precision).round().max(0.0) as u64;
        let target = self.sim_time().saturating_add(ticks);
        loop {
            if target <= self.sim_time() {
                *self.data.lock().expect("data mutex poisoned") = None;
                return Ok(());
            }
            *self.data.lock().expect("data mutex poisoned") = Some(target);
            if self.reply_tx.send(BlockReply::DelayWait).is_err() {
                return Err(SimError::Aborted);
            }
            match self.cmd_rx.recv() {
                Ok(BlockCmd::Run) => continue,
                Ok(BlockCmd::Finish) | Err(_) => return Err(SimError::Aborted),
            }
        }
    }

    /// Block until the coordinator sends the next `BlockRun`; returns
    /// `false` on `Finish`/channel closure.
    fn await_run(&self) -> bool {
        matches!(self.cmd_rx.recv(), Ok(BlockCmd::Run))
    }

    fn send_reply(&self, reply: BlockReply) {
        // The coordinator has already stopped listening once a worker is
        // torn down; a failed send here just means we're mid-shutdown.
        let _ = self.reply_tx.send(reply);
    }
}

struct BlockWorker {
    cmd_tx: Sender<BlockCmd>,
    reply_rx: Receiver<BlockReply>,
    data: Arc<Mutex<Option<u64>>>,
    handle: Option<JoinHandle<()>>,
}

struct ModuleWorker {
    cmd_tx: Sender<ModuleCmd>,
    reply_rx: Receiver<ModuleReply>,
    handle: Option<JoinHandle<()>>,
}

/// The discrete-event engine: coordinates every module, initializer, and
/// sensitivity clause worker and owns the single monotonically
/// nondecreasing `simTime` counter.
///
/// Unlike `original_source/simulator.go`'s `sync.Once` process-wide
/// singleton, this is an explicit, owned object per spec §9's design note
/// ("re-architect as an owned simulator object passed explicitly").
pub struct Scheduler {
    state: SchedulerState,
    timescale: f64,
    precision: f64,
    sim_time: Arc<Mutex<u64>>,
    pending_modules: Vec<ModuleWorkerSpec>,
    pending_initializers: Vec<InitializerBody>,
    pending_clauses: Vec<(SensitivityClause, ClauseBody)>,
    num_init_blocks: u32,
    num_sense_clauses: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// An uninitialized scheduler. Call [`Scheduler::initialize`] before
    /// registering modules or running.
    pub fn new() -> Self {
        Scheduler {
            state: SchedulerState::Uninitialized,
            timescale: 0.0,
            precision: 0.0,
            sim_time: Arc::new(Mutex::new(0)),
            pending_modules: Vec::new(),
            pending_initializers: Vec::new(),
            pending_clauses: Vec::new(),
            num_init_blocks: 0,
            num_sense_clauses: 0,
        }
    }

    /// Configure the timescale/precision (both positive seconds) and reset
    /// `simTime` to zero. `timescale / precision` is the integer number of
    /// ticks a one-unit `Delay` advances.
    pub fn initialize(&mut self, timescale: f64, precision: f64) {
        self.timescale = timescale;
        self.precision = precision;
        *self.sim_time.lock().expect("sim_time mutex poisoned") = 0;
        self.state = SchedulerState::Initialized;
    }

    /// The scheduler's current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The coordinator's current simulated time, in precision-unit ticks.
    pub fn sim_time(&self) -> u64 {
        *self.sim_time.lock().expect("sim_time mutex poisoned")
    }

    /// Register a top-level module: flattens it and its sub-module tree
    /// into per-module worker specs plus the initializer/sensitivity
    /// bodies they carry, and accumulates the cumulative block counts
    /// spec §4.5's lifecycle step 2 calls for.
    pub fn register_module(&mut self, module: Module) {
        self.num_init_blocks += module.total_initializer_count();
        self.num_sense_clauses += module.total_sensitivity_count();
        let (modules, initializers, clauses) = module.into_flattened();
        self.pending_modules.extend(modules);
        self.pending_initializers.extend(initializers);
        self.pending_clauses.extend(clauses);
    }

    /// Total initializer blocks across every registered module.
    pub fn initializer_count(&self) -> u32 {
        self.num_init_blocks
    }

    /// Total sensitivity clauses across every registered module.
    pub fn sensitivity_count(&self) -> u32 {
        self.num_sense_clauses
    }

    /// Run the simulation to quiescence or an explicit finish.
    ///
    /// Spawns one worker thread per registered module, initializer, and
    /// sensitivity clause, then drives the main loop (spec §4.5 a-g) until
    /// either a body signals finish or every active worker has completed
    /// with nothing left to wait on.
    pub fn run(&mut self) -> SimResult<()> {
        self.state = SchedulerState::Running;
        tracing::info!(
            timescale = self.timescale,
            precision = self.precision,
            "starting simulation run"
        );

        let module_workers: Vec<ModuleWorker> = self
            .pending_modules
            .drain(..)
            .map(spawn_module_worker)
            .collect();

        let mut block_workers: Vec<BlockWorker> = Vec::new();
        for body in self.pending_initializers.drain(..) {
            block_workers.push(spawn_initializer_worker(
                body,
                self.sim_time.clone(),
                self.timescale,
                self.precision,
            ));
        }
        for (clause, body) in self.pending_clauses.drain(..) {
            block_workers.push(spawn_sensitivity_worker(
                clause,
                body,
                self.sim_time.clone(),
                self.timescale,
                self.precision,
            ));
        }

        let mut active: Vec<usize> = (0..block_workers.len()).collect();
        let mut sim_finished = false;

        loop {
            let expected = active.len();
            for &i in &active {
                let _ = block_workers[i].cmd_tx.send(BlockCmd::Run);
            }

            let mut wait_count = 0u32;
            let mut delay_count = 0u32;
            let mut next_active = Vec::with_capacity(active.len());
            for &i in &active {
                match block_workers[i].reply_rx.recv() {
                    Ok(BlockReply::Progress) => next_active.push(i),
                    Ok(BlockReply::Wait) => {
                        wait_count += 1;
                        next_active.push(i);
                    }
                    Ok(BlockReply::DelayWait) => {
                        delay_count += 1;
                        next_active.push(i);
                    }
                    Ok(BlockReply::Complete) => {}
                    Ok(BlockReply::Finish) => {
                        sim_finished = true;
                    }
                    Ok(BlockReply::Error(e)) => {
                        tracing::warn!(error = %e, "procedural body reported an error");
                    }
                    Err(_) => {}
                }
            }
            active = next_active;

            for w in &module_workers {
                let _ = w.cmd_tx.send(ModuleCmd::UpdateRegisters);
            }
            for w in &module_workers {
                let _ = w.reply_rx.recv();
            }

            for w in &module_workers {
                let _ = w.cmd_tx.send(ModuleCmd::PropagateWireValues);
            }
            for w in &module_workers {
                let _ = w.reply_rx.recv();
            }

            if sim_finished {
                tracing::info!(sim_time = self.sim_time(), "simulation finished");
                break;
            }

            if active.is_empty() {
                tracing::info!(sim_time = self.sim_time(), "simulation quiescent, no finish signaled");
                break;
            }

            if wait_count + delay_count == expected {
                let min_target = active
                    .iter()
                    .filter_map(|&i| *block_workers[i].data.lock().expect("data mutex poisoned"))
                    .min();
                if let Some(target) = min_target {
                    let mut t = self.sim_time.lock().expect("sim_time mutex poisoned");
                    if target > *t {
                        *t = target;
                    }
                }
            }
        }

        for w in &block_workers {
            let _ = w.cmd_tx.send(BlockCmd::Finish);
        }
        for w in &module_workers {
            let _ = w.cmd_tx.send(ModuleCmd::Finish);
        }
        for mut w in block_workers {
            if let Some(handle) = w.handle.take() {
                let _ = handle.join();
            }
        }
        for mut w in module_workers {
            if let Some(handle) = w.handle.take() {
                let _ = handle.join();
            }
        }

        self.state = SchedulerState::Finished;
        Ok(())
    }
}

fn spawn_module_worker(spec: ModuleWorkerSpec) -> ModuleWorker {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ModuleCmd>();
    let (reply_tx, reply_rx) = mpsc::channel::<ModuleReply>();
    let ModuleWorkerSpec {
        name,
        registers,
        wires,
    } = spec;

    let handle = thread::spawn(move || {
        module_worker_loop(name, registers, wires, &cmd_rx, &reply_tx);
    });

    ModuleWorker {
        cmd_tx,
        reply_rx,
        handle: Some(handle),
    }
}

fn module_worker_loop(
    name: String,
    registers: Vec<RegisterHandle>,
    wires: Vec<WireHandle>,
    cmd_rx: &Receiver<ModuleCmd>,
    reply_tx: &Sender<ModuleReply>,
) {
    loop {
        match cmd_rx.recv() {
            Ok(ModuleCmd::UpdateRegisters) => {
                for r in &registers {
                    let before = r.current();
                    r.commit();
                    let after = r.current();
                    if before != after {
                        tracing::debug!(
                            module = %name,
                            register = %r.name(),
                            from = %before,
                            to = %after,
                            "register committed"
                        );
                    }
                }
                if reply_tx.send(ModuleReply::RegisterUpdateComplete).is_err() {
                    return;
                }
            }
            Ok(ModuleCmd::PropagateWireValues) => {
                for w in &wires {
                    w.propagate();
                }
                if reply_tx.send(ModuleReply::WirePropagateComplete).is_err() {
                    return;
                }
            }
            Ok(ModuleCmd::Finish) | Err(_) => return,
        }
    }
}

fn spawn_initializer_worker(
    body: InitializerBody,
    sim_time: Arc<Mutex<u64>>,
    timescale: f64,
    precision: f64,
) -> BlockWorker {
    let (cmd_tx, cmd_rx) = mpsc::channel::<BlockCmd>();
    let (reply_tx, reply_rx) = mpsc::channel::<BlockReply>();
    let data = Arc::new(Mutex::new(None));
    let ctx = BlockContext {
        sim_time,
        timescale,
        precision,
        data: data.clone(),
        cmd_rx,
        reply_tx,
    };

    let handle = thread::spawn(move || {
        initializer_worker_loop(body, ctx);
    });

    BlockWorker {
        cmd_tx,
        reply_rx,
        data,
        handle: Some(handle),
    }
}

fn initializer_worker_loop(body: InitializerBody, mut ctx: BlockContext) {
    if !ctx.await_run() {
        return;
    }
    let reply = match body(&mut ctx) {
        Ok(BodyOutcome::Progress) => BlockReply::Complete,
        Ok(BodyOutcome::Finish) => BlockReply::Finish,
        Err(SimError::Aborted) => return,
        Err(e) => BlockReply::Error(e),
    };
    ctx.send_reply(reply);
}

fn spawn_sensitivity_worker(
    clause: SensitivityClause,
    body: ClauseBody,
    sim_time: Arc<Mutex<u64>>,
    timescale: f64,
    precision: f64,
) -> BlockWorker {
    let (cmd_tx, cmd_rx) = mpsc::channel::<BlockCmd>();
    let (reply_tx, reply_rx) = mpsc::channel::<BlockReply>();
    let data = Arc::new(Mutex::new(None));
    let ctx = BlockContext {
        sim_time,
        timescale,
        precision,
        data: data.clone(),
        cmd_rx,
        reply_tx,
    };

    let handle = thread::spawn(move || {
        sensitivity_worker_loop(clause, body, ctx);
    });

    BlockWorker {
        cmd_tx,
        reply_rx,
        data,
        handle: Some(handle),
    }
}

fn sensitivity_worker_loop(clause: SensitivityClause, mut body: ClauseBody, mut ctx: BlockContext) {
    loop {
        if !ctx.await_run() {
            return;
        }
        if !clause.is_active() {
            ctx.send_reply(BlockReply::Wait);
            continue;
        }
        match body(&mut ctx) {
            Ok(BodyOutcome::Progress) => ctx.send_reply(BlockReply::Progress),
            Ok(BodyOutcome::Finish) => {
                ctx.send_reply(BlockReply::Finish);
                return;
            }
            Err(SimError::Aborted) => return,
            Err(e) => ctx.send_reply(BlockReply::Error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        logic_state::LogicState,
        sensitivity::{
            Sensitivity,
            SensitivityQualifier,
        },
    };

    #[test]
    fn empty_scheduler_run_terminates() {
        let mut s = Scheduler::new();
        s.initialize(1e-9, 1e-9);
        s.run().unwrap();
        assert_eq!(s.state(), SchedulerState::Finished);
    }

    #[test]
    fn single_initializer_without_delay_completes_at_time_zero() {
        let mut s = Scheduler::new();
        s.initialize(1e-9, 1e-9);
        let reg = RegisterHandle::new("r");
        let reg_for_body = reg.clone();
        let mut m = Module::new("top");
        m.add_register(reg.clone());
        m.add_initializer(move |_ctx| {
            reg_for_body.set_value(LogicState::Hi)?;
            Ok(BodyOutcome::Progress)
        });
        s.register_module(m);
        s.run().unwrap();
        assert_eq!(s.sim_time(), 0);
        assert_eq!(reg.current(), LogicState::Hi);
    }

    #[test]
    fn initializer_delay_advances_sim_time() {
        let mut s = Scheduler::new();
        s.initialize(1e-9, 1e-9);
        let reg = RegisterHandle::new("r");
        let reg_for_body = reg.clone();
        let mut m = Module::new("top");
        m.add_register(reg.clone());
        m.add_initializer(move |ctx| {
            ctx.delay(10.0)?;
            reg_for_body.set_value(LogicState::Hi)?;
            Ok(BodyOutcome::Progress)
        });
        s.register_module(m);
        s.run().unwrap();
        assert_eq!(s.sim_time(), 10);
        assert_eq!(reg.current(), LogicState::Hi);
    }

    #[test]
    fn initializer_finish_stops_the_run() {
        let mut s = Scheduler::new();
        s.initialize(1e-9, 1e-9);
        let mut m = Module::new("top");
        m.add_initializer(|_ctx| Ok(BodyOutcome::Finish));
        s.register_module(m);
        s.run().unwrap();
        assert_eq!(s.state(), SchedulerState::Finished);
    }

    /// The clock-toggle scenario from spec §8's concrete scenarios: one
    /// initializer holds `clk` low then finishes at time 100; one
    /// always-active sensitivity clause toggles `clk` every 5 units.
    #[test]
    fn clock_toggle_scenario_finishes_at_100() {
        let mut s = Scheduler::new();
        s.initialize(1e-9, 1e-9);

        let clk = RegisterHandle::new("clk");
        let mut m = Module::new("top");
        m.add_register(clk.clone());

        let clk_init = clk.clone();
        m.add_initializer(move |ctx| {
            clk_init.set_value(LogicState::Lo)?;
            ctx.delay(100.0)?;
            Ok(BodyOutcome::Finish)
        });

        let clk_toggle = clk.clone();
        m.add_sensitivity_clause(SensitivityClause::always(), move |ctx| {
            ctx.delay(5.0)?;
            let next = clk_toggle.current().invert();
            clk_toggle.set_value(next)?;
            Ok(BodyOutcome::Progress)
        });

        s.register_module(m);
        s.run().unwrap();
        assert_eq!(s.sim_time(), 100);
    }

    #[test]
    fn pos_edge_clause_only_fires_on_rising_transition() {
        let mut s = Scheduler::new();
        s.initialize(1e-9, 1e-9);

        let clk = RegisterHandle::new("clk");
        let edges = RegisterHandle::new("edges");
        edges.set_value(LogicState::Lo).unwrap();
        edges.commit();

        let mut m = Module::new("top");
        m.add_register(clk.clone());
        m.add_register(edges.clone());

        let clk_init = clk.clone();
        m.add_initializer(move |ctx| {
            clk_init.set_value(LogicState::Lo)?;
            ctx.delay(1.0)?;
            clk_init.set_value(LogicState::Hi)?;
            ctx.delay(1.0)?;
            Ok(BodyOutcome::Finish)
        });

        let edge_clause = SensitivityClause::new(vec![Sensitivity::new(
            clk.clone(),
            SensitivityQualifier::PosEdge,
        )]);
        let edges_body = edges.clone();
        m.add_sensitivity_clause(edge_clause, move |_ctx| {
            edges_body.set_value(LogicState::Hi)?;
            Ok(BodyOutcome::Progress)
        });

        s.register_module(m);
        s.run().unwrap();
        assert_eq!(edges.current(), LogicState::Hi);
    }
}
