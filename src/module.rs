//! The named container hierarchy that owns signals and procedures.
//!
//! A [`Module`] bundles registers, wires, initializer procedures,
//! sensitivity-driven clauses, and sub-modules under a name. It is the
//! authoring surface user design code assembles a hierarchy with; the
//! [`crate::scheduler::Scheduler`] consumes it (via
//! [`Scheduler::register_module`](crate::scheduler::Scheduler::register_module))
//! and flattens it into one worker per module, matching
//! `getNumBlocks`/`getAllInitializers` in the Go source this core was
//! distilled from (`original_source/module.go`), except that here every
//! sub-module gets its own worker rather than being walked recursively at
//! commit time.

use crate::{
    scheduler::{
        BlockContext,
        BodyResult,
    },
    sensitivity::SensitivityClause,
    signal::{
        RegisterHandle,
        WireHandle,
    },
};

/// A procedural body run exactly once by an initializer worker.
pub type InitializerBody = Box<dyn FnOnce(&mut BlockContext) -> BodyResult + Send>;

/// A procedural body run on every activation of a sensitivity clause.
pub type ClauseBody = Box<dyn FnMut(&mut BlockContext) -> BodyResult + Send>;

/// A named container of registers, wires, procedures, and sub-modules.
///
/// Ownership: a `Module` exclusively owns the [`InitializerBody`]/
/// [`ClauseBody`] closures and the list structure itself; the
/// [`RegisterHandle`]/[`WireHandle`] values it holds are cheap shared
/// handles also held by whatever procedures (in this module or another)
/// read and write them, matching spec's "registers and wires are
/// referenced non-owningly" rule.
pub struct Module {
    name: String,
    registers: Vec<RegisterHandle>,
    wires: Vec<WireHandle>,
    initializers: Vec<InitializerBody>,
    clauses: Vec<(SensitivityClause, ClauseBody)>,
    sub_modules: Vec<Module>,
}

impl Module {
    /// A new, empty module named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            registers: Vec::new(),
            wires: Vec::new(),
            initializers: Vec::new(),
            clauses: Vec::new(),
            sub_modules: Vec::new(),
        }
    }

    /// The module's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a register this module owns.
    pub fn add_register(&mut self, register: RegisterHandle) -> &mut Self {
        self.registers.push(register);
        self
    }

    /// Add a wire this module owns.
    pub fn add_wire(&mut self, wire: WireHandle) -> &mut Self {
        self.wires.push(wire);
        self
    }

    /// Add an initializer procedure, run exactly once by the scheduler.
    pub fn add_initializer(
        &mut self,
        body: impl FnOnce(&mut BlockContext) -> BodyResult + Send + 'static,
    ) -> &mut Self {
        self.initializers.push(Box::new(body));
        self
    }

    /// Add a sensitivity clause: `clause` gates when `body` fires.
    pub fn add_sensitivity_clause(
        &mut self,
        clause: SensitivityClause,
        body: impl FnMut(&mut BlockContext) -> BodyResult + Send + 'static,
    ) -> &mut Self {
        self.clauses.push((clause, Box::new(body)));
        self
    }

    /// Add a sub-module, owned by this one.
    pub fn add_submodule(&mut self, module: Module) -> &mut Self {
        self.sub_modules.push(module);
        self
    }

    /// Registers directly owned by this module (not sub-modules).
    pub fn registers(&self) -> &[RegisterHandle] {
        &self.registers
    }

    /// Wires directly owned by this module (not sub-modules).
    pub fn wires(&self) -> &[WireHandle] {
        &self.wires
    }

    /// Sub-modules owned by this module.
    pub fn sub_modules(&self) -> &[Module] {
        &self.sub_modules
    }

    /// Total initializer count across this module and every sub-module,
    /// recursively. Mirrors `module.go`'s `getNumBlocks`.
    pub fn total_initializer_count(&self) -> u32 {
        self.initializers.len() as u32
            + self
                .sub_modules
                .iter()
                .map(Module::total_initializer_count)
                .sum::<u32>()
    }

    /// Total sensitivity clause count across this module and every
    /// sub-module, recursively. Mirrors `module.go`'s `getNumBlocks`.
    pub fn total_sensitivity_count(&self) -> u32 {
        self.clauses.len() as u32
            + self
                .sub_modules
                .iter()
                .map(Module::total_sensitivity_count)
                .sum::<u32>()
    }

    /// Consume this module and its whole sub-module tree into the flat
    /// per-module worker specs, initializer bodies, and clause bodies the
    /// scheduler spawns one worker per entry for.
    ///
    /// Each sub-module becomes its own [`ModuleWorkerSpec`] (it is not
    /// walked recursively at commit time — see [`crate::scheduler`]'s
    /// module worker).
    pub(crate) fn into_flattened(
        self,
    ) -> (
        Vec<ModuleWorkerSpec>,
        Vec<InitializerBody>,
        Vec<(SensitivityClause, ClauseBody)>,
    ) {
        let mut modules = Vec::new();
        let mut initializers = Vec::new();
        let mut clauses = Vec::new();
        self.flatten_into(&mut modules, &mut initializers, &mut clauses);
        (modules, initializers, clauses)
    }

    fn flatten_into(
        self,
        modules: &mut Vec<ModuleWorkerSpec>,
        initializers: &mut Vec<InitializerBody>,
        clauses: &mut Vec<(SensitivityClause, ClauseBody)>,
    ) {
        modules.push(ModuleWorkerSpec {
            name: self.name,
            registers: self.registers,
            wires: self.wires,
        });
        initializers.extend(self.initializers);
        clauses.extend(self.clauses);
        for sub in self.sub_modules {
            sub.flatten_into(modules, initializers, clauses);
        }
    }
}

/// One module's registers and wires, detached from its procedures and
/// sub-module list — exactly what a module worker needs to commit
/// registers and propagate wires at the scheduler's phase barriers.
pub(crate) struct ModuleWorkerSpec {
    pub name: String,
    pub registers: Vec<RegisterHandle>,
    pub wires: Vec<WireHandle>,
}
