use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hvac_contract::{Function, Invocation};

mod commands;
mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "hvac",
    about = "HVAC maintenance ledger: record and query maintenance entries",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Config file (default: ./hvac.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding ledger.redb; overrides [store].data_dir
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Run against an ephemeral in-memory ledger
    #[arg(long, global = true)]
    in_memory: bool,

    /// Output format: text prints the payload, json prints the response envelope
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the instantiation hook (no state is touched)
    Init,
    /// Write the four seed maintenance records
    InitLedger,
    /// Create or overwrite a maintenance record
    Create {
        key: String,
        /// Install date, unix seconds
        #[arg(allow_hyphen_values = true)]
        install_date: String,
        /// Maintenance date, unix seconds
        #[arg(allow_hyphen_values = true)]
        maintenance_date: String,
        building_id: String,
        installer_id: String,
    },
    /// Show the record stored at a key
    Show { key: String },
    /// Show every record in the seed key range
    ShowAll,
    /// Records whose installer id equals the argument
    FilterInstaller { installer_id: String },
    /// Records whose building id equals the argument
    FilterBuilding { building_id: String },
    /// Records installed strictly before the given unix time
    FilterInstalledBefore {
        #[arg(allow_hyphen_values = true)]
        epoch: String,
    },
    /// Records maintained strictly after the given unix time
    FilterMaintainedAfter {
        #[arg(allow_hyphen_values = true)]
        epoch: String,
    },
    /// Invoke a contract function by wire name with raw positional arguments
    Invoke {
        function: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

impl Commands {
    /// The contract call this command stands for; `None` for the
    /// instantiation hook.
    fn into_invocation(self) -> Option<Invocation> {
        let invocation = match self {
            Commands::Init => return None,
            Commands::InitLedger => Invocation::call(Function::InitLedger, Vec::<String>::new()),
            Commands::Create {
                key,
                install_date,
                maintenance_date,
                building_id,
                installer_id,
            } => Invocation::call(
                Function::CreateNewMaintenance,
                [key, install_date, maintenance_date, building_id, installer_id],
            ),
            Commands::Show { key } => Invocation::call(Function::ShowSingleMaintenance, [key]),
            Commands::ShowAll => {
                Invocation::call(Function::ShowAllHvacMaintenance, Vec::<String>::new())
            }
            Commands::FilterInstaller { installer_id } => {
                Invocation::call(Function::FilterByInstallerId, [installer_id])
            }
            Commands::FilterBuilding { building_id } => {
                Invocation::call(Function::FilterByBuildingId, [building_id])
            }
            Commands::FilterInstalledBefore { epoch } => {
                Invocation::call(Function::FilterByInstallDates, [epoch])
            }
            Commands::FilterMaintainedAfter { epoch } => {
                Invocation::call(Function::FilterByMaintenanceDate, [epoch])
            }
            Commands::Invoke { function, args } => Invocation::new(function, args),
        };
        Some(invocation)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref(), cli.data_dir, cli.in_memory)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log.filter))?,
        )
        .with_writer(std::io::stderr)
        .init();

    let response = commands::run(cli.command.into_invocation(), &config)?;
    output::print(&response, cli.format)?;

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use hvac_contract::InvocationContext;

    use super::*;

    fn invocation(argv: &[&str]) -> Option<Invocation> {
        Cli::try_parse_from(argv).unwrap().command.into_invocation()
    }

    #[test]
    fn init_has_no_invocation() {
        assert!(invocation(&["hvac", "init"]).is_none());
    }

    #[test]
    fn create_maps_to_five_positional_args() {
        let inv = invocation(&[
            "hvac", "create", "Maintenance9", "1542931200", "-5", "500A", "0005679",
        ])
        .unwrap();
        assert_eq!(inv.function_name(), "createNewMaintenance");
        assert_eq!(
            inv.args(),
            ["Maintenance9", "1542931200", "-5", "500A", "0005679"].map(String::from)
        );
    }

    #[test]
    fn filters_map_to_wire_names() {
        let cases = [
            (["hvac", "filter-installer", "0005679"], "filterByInstallerID"),
            (["hvac", "filter-building", "500A"], "filterByBuildingId"),
            (["hvac", "filter-installed-before", "1"], "filterByInstallDates"),
            (["hvac", "filter-maintained-after", "1"], "filterByMaintenanceDate"),
        ];
        for (argv, expected) in cases {
            let inv = invocation(&argv).unwrap();
            assert_eq!(inv.function_name(), expected);
            assert_eq!(inv.args().len(), 1);
        }
    }

    #[test]
    fn invoke_passes_raw_name_and_args() {
        let inv = invocation(&["hvac", "invoke", "createNewMaintenance", "k", "1"]).unwrap();
        assert_eq!(inv.function_name(), "createNewMaintenance");
        assert_eq!(inv.args(), ["k", "1"].map(String::from));
    }

    #[test]
    fn create_requires_all_fields() {
        assert!(Cli::try_parse_from(["hvac", "create", "k", "1", "2"]).is_err());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["hvac", "show-all", "--in-memory", "--format", "json"]).unwrap();
        assert!(cli.in_memory);
        assert!(matches!(cli.format, OutputFormat::Json));
    }
}
