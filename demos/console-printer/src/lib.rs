//! Console printer
//!
//! A consumer of the object model: two interfaces implemented by one object,
//! created through the object manager with a prefix carried in the
//! construction info.

use ucom::{
    iid_of, ComManagerExt, ComRef, ConstructionInfo, IComManager, IUnknown, InterfaceSlot,
    QueryTable, RefCount, ResultCode, Uuid,
};

/// Prints text without a trailing newline
pub trait IConsolePrinter: IUnknown {
    fn print(&self, text: &str);
}

ucom::declare_iid!(dyn IConsolePrinter, 0xBCE8AB2D7BC458BE, 0xED4A89E7B2284D6B);

/// Prints text followed by a newline
pub trait IConsoleLinePrinter: IUnknown {
    fn print_ln(&self, text: &str);
}

ucom::declare_iid!(dyn IConsoleLinePrinter, 0x98716AFD4475A23C, 0xB8565C0769E9454E);

/// Construction payload for both printer identifiers
#[derive(Clone, Debug, Default)]
pub struct PrinterParams {
    /// Text written before every message
    pub prefix: Option<String>,
}

/// Printer object behind both interfaces
pub struct ConsolePrinter {
    refs: RefCount,
    prefix: Option<String>,
}

impl ConsolePrinter {
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            refs: RefCount::new(),
            prefix,
        }
    }

    /// Text as it will be printed
    pub fn render(&self, text: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{text}"),
            None => text.to_string(),
        }
    }

    /// Factory for both printer identifiers
    ///
    /// Construction info is required and must contain a record tagged with
    /// the requested identifier that carries [`PrinterParams`].
    pub fn factory(
        iid: &Uuid,
        slot: Option<&mut InterfaceSlot>,
        info: Option<&ConstructionInfo<'_>>,
    ) -> ResultCode {
        let (Some(slot), Some(info)) = (slot, info) else {
            return ResultCode::NullParam;
        };

        if *iid != iid_of::<dyn IConsolePrinter>() && *iid != iid_of::<dyn IConsoleLinePrinter>() {
            return ResultCode::InterfaceNotFound;
        }
        let Some(record) = info.find(iid) else {
            return ResultCode::InterfaceNotFound;
        };
        let Some(params) = record.payload::<PrinterParams>() else {
            return ResultCode::InvalidParam;
        };

        match ComRef::try_new(Self::new(params.prefix.clone())) {
            Ok(printer) => printer.query_interface(iid, Some(slot)),
            Err(err) => err.code(),
        }
    }
}

// SAFETY: ref_counter returns the embedded `refs` field
unsafe impl IUnknown for ConsolePrinter {
    ucom::impl_ref_count!(refs);

    fn query_interface(&self, iid: &Uuid, slot: Option<&mut InterfaceSlot>) -> ResultCode {
        QueryTable::new(iid, slot)
            .entry::<dyn IUnknown>(self)
            .entry::<dyn IConsolePrinter>(self)
            .entry::<dyn IConsoleLinePrinter>(self)
            .finish()
    }
}

impl IConsolePrinter for ConsolePrinter {
    fn print(&self, text: &str) {
        print!("{}", self.render(text));
    }
}

impl IConsoleLinePrinter for ConsolePrinter {
    fn print_ln(&self, text: &str) {
        println!("{}", self.render(text));
    }
}

/// Register the printer factory under both printer identifiers
///
/// An existing registration is not an error.
pub fn register_console_printer(manager: Option<&dyn IComManager>) -> ResultCode {
    let Some(manager) = manager else {
        return ResultCode::NullParam;
    };

    let result = manager.register::<dyn IConsolePrinter>(ConsolePrinter::factory);
    if result.is_failure() {
        return result;
    }

    manager.register::<dyn IConsoleLinePrinter>(ConsolePrinter::factory)
}
