//! Console Printer Demo
//!
//! Fetches the process-wide object manager, registers the printer factory,
//! creates a printer with a prefix and prints through one of its views.
//!
//! Run with: cargo run --bin printer-demo -- --prefix "[demo] " --line

use clap::Parser;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use console_printer::{
    register_console_printer, IConsoleLinePrinter, IConsolePrinter, PrinterParams,
};
use ucom::{com_manager, ComManagerExt, ConstructionInfo, QueryInterfaceExt};

#[derive(Parser)]
#[command(name = "printer-demo")]
#[command(about = "Create a console printer through the object manager")]
struct Args {
    /// Text printed before the message
    #[arg(short, long)]
    prefix: Option<String>,

    /// Message to print
    #[arg(short, long, default_value = "Hello from the object manager")]
    message: String,

    /// Print through the line printer view
    #[arg(short, long)]
    line: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let manager = com_manager()?;
    register_console_printer(Some(&*manager)).into_result()?;

    let params = PrinterParams {
        prefix: args.prefix.clone(),
    };
    let info = ConstructionInfo::for_interface::<dyn IConsolePrinter, _>(&params);
    let printer = manager.create_with::<dyn IConsolePrinter>(&info)?;
    debug!("printer created with prefix {:?}", params.prefix);

    if args.line {
        let line = printer.query::<dyn IConsoleLinePrinter>()?;
        line.print_ln(&args.message);
    } else {
        printer.print(&args.message);
        println!();
    }

    Ok(())
}
