//! The closed set of callable contract functions.

use std::fmt;
use std::str::FromStr;

use crate::error::ContractError;

/// How many positional arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    /// Arguments are accepted and ignored.
    Any,
}

impl Arity {
    pub fn check(self, got: usize) -> Result<(), ContractError> {
        let expected = match self {
            Arity::Exactly(n) if got != n => n,
            Arity::AtLeast(n) if got < n => n,
            _ => return Ok(()),
        };
        Err(ContractError::ArgumentCount { expected, got })
    }
}

/// A contract function, addressed on the wire by [`Function::name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    InitLedger,
    CreateNewMaintenance,
    ShowSingleMaintenance,
    ShowAllHvacMaintenance,
    FilterByInstallerId,
    FilterByBuildingId,
    FilterByInstallDates,
    FilterByMaintenanceDate,
}

impl Function {
    pub const ALL: [Function; 8] = [
        Function::InitLedger,
        Function::CreateNewMaintenance,
        Function::ShowSingleMaintenance,
        Function::ShowAllHvacMaintenance,
        Function::FilterByInstallerId,
        Function::FilterByBuildingId,
        Function::FilterByInstallDates,
        Function::FilterByMaintenanceDate,
    ];

    /// Wire name used by invocation contexts.
    pub fn name(self) -> &'static str {
        match self {
            Function::InitLedger => "initLedger",
            Function::CreateNewMaintenance => "createNewMaintenance",
            Function::ShowSingleMaintenance => "showSingleMaintenance",
            Function::ShowAllHvacMaintenance => "showAllHvacMaintenance",
            Function::FilterByInstallerId => "filterByInstallerID",
            Function::FilterByBuildingId => "filterByBuildingId",
            Function::FilterByInstallDates => "filterByInstallDates",
            Function::FilterByMaintenanceDate => "filterByMaintenanceDate",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            Function::InitLedger | Function::ShowAllHvacMaintenance => Arity::Any,
            Function::CreateNewMaintenance => Arity::Exactly(5),
            Function::ShowSingleMaintenance => Arity::Exactly(1),
            Function::FilterByInstallerId
            | Function::FilterByBuildingId
            | Function::FilterByInstallDates
            | Function::FilterByMaintenanceDate => Arity::AtLeast(1),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::ALL
            .into_iter()
            .find(|function| function.name() == s)
            .ok_or_else(|| ContractError::UnknownFunction(s.to_string()))
    }
}
