//! Command table
//!
//! Every subcommand is one [`CommandSpec`] row: its name, its flags and the
//! handler that runs it. The clap parser is generated from the table, so a
//! flag's long name, short alias and default live in exactly one place.

use std::io::Write;

use anyhow::{anyhow, bail, Result};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;
use xlcli::SpreadsheetService;

use crate::output::{self, RangeFormat};

/// How a flag is declared on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// Must be given
    Required,
    /// May be omitted
    Optional,
    /// May be omitted, falls back to the value
    Default(&'static str),
    /// Boolean switch without a value
    Switch,
}

/// One command-line flag
#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub long: &'static str,
    pub short: Option<char>,
    /// Extra long name, e.g. `--sh` for `--sheet`
    pub alias: Option<&'static str>,
    pub help: &'static str,
    pub kind: FlagKind,
    /// Accepted values, matched without regard to case
    pub values: Option<&'static [&'static str]>,
}

impl FlagSpec {
    const fn new(long: &'static str, short: Option<char>, kind: FlagKind, help: &'static str) -> Self {
        Self {
            long,
            short,
            alias: None,
            help,
            kind,
            values: None,
        }
    }

    pub const fn required(long: &'static str, short: char, help: &'static str) -> Self {
        Self::new(long, Some(short), FlagKind::Required, help)
    }

    pub const fn optional(long: &'static str, short: char, help: &'static str) -> Self {
        Self::new(long, Some(short), FlagKind::Optional, help)
    }

    pub const fn defaulted(
        long: &'static str,
        short: char,
        default: &'static str,
        help: &'static str,
    ) -> Self {
        Self::new(long, Some(short), FlagKind::Default(default), help)
    }

    pub const fn switch(long: &'static str, short: char, help: &'static str) -> Self {
        Self::new(long, Some(short), FlagKind::Switch, help)
    }

    /// Drop the short alias
    pub const fn long_only(self) -> Self {
        Self {
            short: None,
            ..self
        }
    }

    pub const fn with_alias(self, alias: &'static str) -> Self {
        Self {
            alias: Some(alias),
            ..self
        }
    }

    pub const fn one_of(self, values: &'static [&'static str]) -> Self {
        Self {
            values: Some(values),
            ..self
        }
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.long).long(self.long).help(self.help);
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(alias) = self.alias {
            arg = arg.visible_alias(alias);
        }
        if let Some(values) = self.values {
            arg = arg
                .value_parser(PossibleValuesParser::new(values.iter().copied()))
                .ignore_case(true);
        }

        match self.kind {
            FlagKind::Required => arg.action(ArgAction::Set).required(true),
            FlagKind::Optional => arg.action(ArgAction::Set),
            FlagKind::Default(value) => arg.action(ArgAction::Set).default_value(value),
            FlagKind::Switch => arg.action(ArgAction::SetTrue),
        }
    }
}

/// Parsed arguments of one invocation plus the service to run against
pub struct Context<'a> {
    pub service: &'a SpreadsheetService,
    matches: &'a ArgMatches,
}

impl<'a> Context<'a> {
    pub fn new(service: &'a SpreadsheetService, matches: &'a ArgMatches) -> Self {
        Self { service, matches }
    }

    /// A flag that always has a value (required or defaulted)
    pub fn value(&self, id: &str) -> Result<&'a str> {
        self.optional(id)
            .ok_or_else(|| anyhow!("Missing required option --{}", id))
    }

    pub fn optional(&self, id: &str) -> Option<&'a str> {
        self.matches.get_one::<String>(id).map(String::as_str)
    }

    pub fn switch(&self, id: &str) -> bool {
        self.matches.get_flag(id)
    }
}

pub type Handler = fn(&Context<'_>, &mut dyn Write) -> Result<()>;

/// One subcommand
pub struct CommandSpec {
    pub name: &'static str,
    pub about: &'static str,
    pub flags: &'static [FlagSpec],
    pub run: Handler,
}

impl CommandSpec {
    fn to_command(&self) -> Command {
        Command::new(self.name)
            .about(self.about)
            .args(self.flags.iter().map(FlagSpec::to_arg))
    }
}

const PATH: FlagSpec = FlagSpec::required("path", 'p', "Path to the Excel file (.xlsx)");
const SHEET: FlagSpec =
    FlagSpec::required("sheet", 's', "Worksheet name (case-sensitive, must exist)");
const CELL: FlagSpec = FlagSpec::required("cell", 'c', "Cell address in A1 notation (e.g. A1, B2)");
const RANGE: FlagSpec =
    FlagSpec::required("range", 'r', "Cell range in A1:B2 notation (e.g. A1:D10)");

const RANGE_FORMATS: &[&str] = &RangeFormat::NAMES;
const EXPORT_FORMATS: &[&str] = &["csv", "json"];

/// Every subcommand, in help order
pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "read-file",
        about: "Show file information and the sheets it contains",
        flags: &[PATH],
        run: read_file,
    },
    CommandSpec {
        name: "list-sheets",
        about: "List all worksheets with their used dimensions",
        flags: &[PATH],
        run: list_sheets,
    },
    CommandSpec {
        name: "read-cell",
        about: "Print the stored content of a cell (formulas are shown as text)",
        flags: &[PATH, SHEET, CELL],
        run: read_cell,
    },
    CommandSpec {
        name: "get-cell-value",
        about: "Print the calculated value of a cell",
        flags: &[PATH, SHEET, CELL],
        run: get_cell_value,
    },
    CommandSpec {
        name: "read-range",
        about: "Print the contents of a range of cells",
        flags: &[
            PATH,
            SHEET,
            RANGE,
            FlagSpec::defaulted("format", 'f', "table", "Output format: table, csv or json")
                .one_of(RANGE_FORMATS),
        ],
        run: read_range,
    },
    CommandSpec {
        name: "write-cell",
        about: "Write a value to a cell, replacing any formula",
        flags: &[
            PATH,
            SHEET,
            CELL,
            FlagSpec::required("value", 'v', "Value to write; numbers are stored as numbers"),
        ],
        run: write_cell,
    },
    CommandSpec {
        name: "write-range",
        about: "Write a JSON array of rows into a range, anchored at its top-left cell",
        flags: &[
            PATH,
            SHEET,
            RANGE,
            FlagSpec::required(
                "data",
                'd',
                "Rows as a JSON array of arrays, e.g. '[[\"a\",1],[\"b\",2]]'",
            ),
        ],
        run: write_range,
    },
    CommandSpec {
        name: "create-sheet",
        about: "Add an empty worksheet",
        flags: &[
            PATH,
            FlagSpec::required("name", 'n', "Name of the new worksheet (max 31 characters)"),
        ],
        run: create_sheet,
    },
    CommandSpec {
        name: "delete-sheet",
        about: "Delete a worksheet (the last one cannot be deleted)",
        flags: &[
            PATH,
            FlagSpec::required("name", 'n', "Name of the worksheet to delete"),
        ],
        run: delete_sheet,
    },
    CommandSpec {
        name: "rename-sheet",
        about: "Rename a worksheet",
        flags: &[
            PATH,
            FlagSpec::required("old-name", 'o', "Current worksheet name"),
            FlagSpec::required("new-name", 'n', "New worksheet name"),
        ],
        run: rename_sheet,
    },
    CommandSpec {
        name: "copy-sheet",
        about: "Copy a worksheet into another file, creating the file if needed",
        flags: &[
            FlagSpec::required("source", 's', "Path to the source Excel file"),
            FlagSpec::required("sheet", 's', "Worksheet to copy")
                .long_only()
                .with_alias("sh"),
            FlagSpec::required(
                "target",
                't',
                "Path to the target Excel file (may equal the source)",
            ),
            FlagSpec::optional(
                "new-name",
                'n',
                "Name for the copy (defaults to the source sheet name)",
            ),
        ],
        run: copy_sheet,
    },
    CommandSpec {
        name: "find-value",
        about: "Find cells whose text contains a value, ignoring case",
        flags: &[
            PATH,
            SHEET,
            FlagSpec::required("value", 'v', "Text to look for"),
            FlagSpec::switch("all", 'a', "Report every match instead of only the first"),
        ],
        run: find_value,
    },
    CommandSpec {
        name: "insert-formula",
        about: "Store a formula in a cell",
        flags: &[
            PATH,
            SHEET,
            CELL,
            FlagSpec::required("formula", 'f', "Formula, with or without the leading '='"),
        ],
        run: insert_formula,
    },
    CommandSpec {
        name: "export-sheet",
        about: "Export the used range of a worksheet to CSV or JSON",
        flags: &[
            PATH,
            SHEET,
            FlagSpec::required("output", 'o', "Path of the file to write"),
            FlagSpec::required("format", 'f', "Export format: csv or json"),
        ],
        run: export_sheet,
    },
    CommandSpec {
        name: "import-data",
        about: "Import a CSV or JSON file into a worksheet",
        flags: &[
            PATH,
            SHEET,
            FlagSpec::required("input", 'i', "CSV or JSON file to read (chosen by extension)"),
            FlagSpec::defaulted(
                "start-cell",
                'c',
                "A1",
                "Top-left cell where the data is written",
            ),
        ],
        run: import_data,
    },
];

/// Build the clap parser from [`COMMANDS`]
pub fn build_cli() -> Command {
    Command::new("excel-cli")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read and modify Excel workbooks (.xlsx) from the command line")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log more detail to stderr (repeat for debug output)"),
        )
        .subcommands(COMMANDS.iter().map(CommandSpec::to_command))
}

/// Run the subcommand selected in `matches`
pub fn run(matches: &ArgMatches, service: &SpreadsheetService, out: &mut dyn Write) -> Result<()> {
    let Some((name, sub_matches)) = matches.subcommand() else {
        bail!("No command given");
    };
    let spec = COMMANDS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| anyhow!("Unknown command '{}'", name))?;

    log::debug!("Running {}", spec.name);
    (spec.run)(&Context::new(service, sub_matches), out)
}

fn read_file(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let path = ctx.value("path")?;
    let info = ctx.service.read_file_info(path)?;
    let sheets = ctx.service.list_sheets(path)?;
    writeln!(out, "{}", output::file_report(&info, &sheets))?;
    Ok(())
}

fn list_sheets(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let sheets = ctx.service.list_sheets(ctx.value("path")?)?;
    writeln!(out, "Worksheets:")?;
    for sheet in &sheets {
        writeln!(out, "{}", output::sheet_line(sheet))?;
    }
    Ok(())
}

fn read_cell(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let cell = ctx.value("cell")?;
    let value = ctx
        .service
        .read_cell(ctx.value("path")?, ctx.value("sheet")?, cell)?;
    writeln!(out, "{}: {}", cell, value)?;
    Ok(())
}

fn get_cell_value(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let cell = ctx.value("cell")?;
    let value = ctx
        .service
        .get_cell_value(ctx.value("path")?, ctx.value("sheet")?, cell)?;
    writeln!(out, "{}: {}", cell, value)?;
    Ok(())
}

fn read_range(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let format_name = ctx.value("format")?;
    let format = RangeFormat::parse(format_name)
        .ok_or_else(|| anyhow!("Unknown output format '{}'", format_name))?;
    let rows = ctx
        .service
        .read_range(ctx.value("path")?, ctx.value("sheet")?, ctx.value("range")?)?;
    writeln!(out, "{}", output::render_rows(&rows, format)?)?;
    Ok(())
}

fn write_cell(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let cell = ctx.value("cell")?;
    let value = ctx.value("value")?;
    ctx.service
        .write_cell(ctx.value("path")?, ctx.value("sheet")?, cell, value)?;
    writeln!(out, "Successfully wrote '{}' to {}", value, cell)?;
    Ok(())
}

fn write_range(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let range = ctx.value("range")?;
    let rows = parse_rows(ctx.value("data")?)?;
    let written = ctx
        .service
        .write_range(ctx.value("path")?, ctx.value("sheet")?, range, &rows)?;
    writeln!(out, "Successfully wrote {} row(s) to {}", written, range)?;
    Ok(())
}

fn create_sheet(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let name = ctx.value("name")?;
    ctx.service.create_sheet(ctx.value("path")?, name)?;
    writeln!(out, "Successfully created sheet '{}'", name)?;
    Ok(())
}

fn delete_sheet(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let name = ctx.value("name")?;
    ctx.service.delete_sheet(ctx.value("path")?, name)?;
    writeln!(out, "Successfully deleted sheet '{}'", name)?;
    Ok(())
}

fn rename_sheet(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let old_name = ctx.value("old-name")?;
    let new_name = ctx.value("new-name")?;
    ctx.service
        .rename_sheet(ctx.value("path")?, old_name, new_name)?;
    writeln!(
        out,
        "Successfully renamed sheet '{}' to '{}'",
        old_name, new_name
    )?;
    Ok(())
}

fn copy_sheet(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let sheet = ctx.value("sheet")?;
    let target = ctx.value("target")?;
    let name = ctx.service.copy_sheet(
        ctx.value("source")?,
        sheet,
        target,
        ctx.optional("new-name"),
    )?;
    writeln!(
        out,
        "Successfully copied sheet '{}' to '{}' as '{}'",
        sheet, target, name
    )?;
    Ok(())
}

fn find_value(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let matches = ctx.service.find_value(
        ctx.value("path")?,
        ctx.value("sheet")?,
        ctx.value("value")?,
        ctx.switch("all"),
    )?;

    if matches.is_empty() {
        writeln!(out, "No matches found.")?;
        return Ok(());
    }
    writeln!(out, "Found {} match(es):", matches.len())?;
    for found in &matches {
        writeln!(out, "  {}: {}", found.address, found.value)?;
    }
    Ok(())
}

fn insert_formula(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let cell = ctx.value("cell")?;
    let formula = ctx.value("formula")?;
    ctx.service
        .insert_formula(ctx.value("path")?, ctx.value("sheet")?, cell, formula)?;
    writeln!(out, "Successfully inserted formula '{}' into {}", formula, cell)?;
    Ok(())
}

fn export_sheet(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let sheet = ctx.value("sheet")?;
    let output = ctx.value("output")?;
    let format = ctx
        .service
        .export_sheet(ctx.value("path")?, sheet, output, ctx.value("format")?)?;
    writeln!(
        out,
        "Successfully exported sheet '{}' to '{}' as {}",
        sheet,
        output,
        format.label()
    )?;
    Ok(())
}

fn import_data(ctx: &Context<'_>, out: &mut dyn Write) -> Result<()> {
    let sheet = ctx.value("sheet")?;
    let input = ctx.value("input")?;
    let start_cell = ctx.value("start-cell")?;
    ctx.service
        .import_data(ctx.value("path")?, sheet, input, start_cell)?;
    writeln!(
        out,
        "Successfully imported data from '{}' to sheet '{}' starting at {}",
        input, sheet, start_cell
    )?;
    Ok(())
}

/// Parse `--data` for write-range: a JSON array of arrays of scalars
fn parse_rows(data: &str) -> Result<Vec<Vec<String>>> {
    let value: Value =
        serde_json::from_str(data).map_err(|e| anyhow!("Invalid --data JSON: {}", e))?;
    let Value::Array(rows) = value else {
        bail!("--data must be a JSON array of rows");
    };

    rows.into_iter()
        .map(|row| match row {
            Value::Array(cells) => Ok(cells.iter().map(cell_text).collect()),
            _ => Err(anyhow!("--data must be a JSON array of rows")),
        })
        .collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
