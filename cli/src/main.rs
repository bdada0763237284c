//! htmlspan CLI - HTML to styled text conversion tool

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use htmlspan::{Configuration, HtmlText, JsonFormat, SpanKind, StyledRange, TextDocument};

#[derive(Parser)]
#[command(name = "htmlspan")]
#[command(version)]
#[command(about = "Convert HTML into plain text with styled spans", long_about = None)]
struct Cli {
    /// Input HTML file (stdin if not specified)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    options: ConvertArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Indent per list nesting level
    #[arg(long, global = true, value_name = "PX", env = "HTMLSPAN_INDENT")]
    indent: Option<f32>,

    /// Keep line breaks at the end of the text
    #[arg(long, global = true)]
    keep_trailing_newlines: bool,

    /// Replace tables with a link showing this text
    #[arg(long, global = true, value_name = "TEXT")]
    table_link: Option<String>,
}

impl ConvertArgs {
    fn configuration(&self) -> Configuration {
        let mut config = Configuration::new();
        if let Some(indent) = self.indent {
            config = config.with_list_indent(indent);
        }
        if self.keep_trailing_newlines {
            config = config.keep_trailing_blank_lines();
        }
        if let Some(text) = &self.table_link {
            config = config.with_table_link(text.clone());
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the converted plain text
    Text {
        /// Input HTML file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print text and spans as JSON
    Json {
        /// Input HTML file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// List the styled spans with the text they cover
    Spans {
        /// Input HTML file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Show the rewritten markup and tag records
    Rewrite {
        /// Input HTML file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let builder = HtmlText::new().with_config(cli.options.configuration());

    let result = match cli.command {
        Some(Commands::Text { input, output }) => {
            cmd_text(&builder, input.as_deref(), output.as_deref())
        }
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&builder, input.as_deref(), output.as_deref(), compact),
        Some(Commands::Spans { input }) => cmd_spans(&builder, input.as_deref()),
        Some(Commands::Rewrite { input }) => cmd_rewrite(&builder, input.as_deref()),
        None => cmd_text(&builder, cli.input.as_deref(), None),
    };

    if let Err(e) = result {
        log::debug!("command failed: {:?}", e);
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_input(input: Option<&Path>) -> io::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut html = String::new();
            io::stdin().lock().read_to_string(&mut html)?;
            Ok(html)
        }
    }
}

fn convert(
    builder: &HtmlText,
    input: Option<&Path>,
) -> Result<TextDocument, Box<dyn std::error::Error>> {
    let html = read_input(input)?;
    Ok(builder.convert(&html)?)
}

fn write_output(content: &str, output: Option<&Path>) -> io::Result<()> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_text(
    builder: &HtmlText,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = convert(builder, input)?;
    write_output(doc.text(), output)?;
    Ok(())
}

fn cmd_json(
    builder: &HtmlText,
    input: Option<&Path>,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = convert(builder, input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = htmlspan::to_json(&doc, format)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_spans(builder: &HtmlText, input: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let doc = convert(builder, input)?;

    println!("{}", "Spans".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for span in doc.spans() {
        println!(
            "{:>5}..{:<5} {:<16} {}",
            span.start,
            span.end,
            describe(span).as_str().bold(),
            format!("{:?}", doc.slice(span).unwrap_or_default()).as_str().dimmed()
        );
    }

    println!();
    println!("{}: {}", "Characters".bold(), doc.text().chars().count());
    println!("{}: {}", "Spans".bold(), doc.spans().len());
    Ok(())
}

fn describe(span: &StyledRange) -> String {
    match &span.kind {
        SpanKind::ListItem(item) => format!("list_item {}", item.glyph()),
        SpanKind::TableCell { row, col } => format!("table_cell {},{}", row, col),
        SpanKind::ClickableRegion { target } => format!("link {}", target),
        SpanKind::Image { source } => format!("image {}", source),
        kind => kind.name().to_string(),
    }
}

fn cmd_rewrite(builder: &HtmlText, input: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let html = read_input(input)?;
    let rewritten = builder.rewrite(&html);

    println!("{}", rewritten.markup);
    println!();
    println!("{}", "Tag Records".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (id, record) in rewritten.metadata.iter().enumerate() {
        println!(
            "{:>4} {:<10} {}",
            id.to_string().as_str().yellow(),
            record.tag,
            serde_json::to_string(&record.kind)?
        );
    }
    Ok(())
}
