use clap::{Parser, Subcommand};

mod cmd;
mod tax;

#[derive(Parser, Debug)]
#[command(
    name = "condotax",
    version,
    about = "Estimate transfer fees and taxes for selling a Thai condominium unit"
)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate fees and taxes for one transfer
    Calc(cmd::calc::CalcCommand),
    /// Holding period between a purchase and a sale date
    Period(cmd::period::PeriodCommand),
    /// Calculate every scenario in a CSV file
    Batch(cmd::batch::BatchCommand),
    /// Search assessed values in a valuation export
    Condos(cmd::condos::CondosCommand),
    /// Print input schemas
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    log::debug!("{:?}", opts);

    match opts.command {
        Command::Calc(calc) => calc.exec(),
        Command::Period(period) => period.exec(),
        Command::Batch(batch) => batch.exec(),
        Command::Condos(condos) => condos.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
