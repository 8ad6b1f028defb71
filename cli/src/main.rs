//! pdfmeta CLI - edit PDF bookmarks, metadata, and attachments as text

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use pdfmeta::PdfFile;

#[derive(Parser)]
#[command(name = "pdfmeta")]
#[command(version)]
#[command(about = "Edit PDF bookmarks, metadata, and attachments through text files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save the outline (bookmarks) to a text file
    SaveOutlines {
        /// Source PDF file
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Output text file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Replace the outline with the contents of a text file
    UpdateOutlines {
        /// PDF file to rewrite
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Text file with one bookmark per line
        #[arg(value_name = "FILE")]
        outlines: PathBuf,
    },

    /// Save the metadata (Info dictionary) to a text file
    SaveMetadata {
        /// Source PDF file
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Output text file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Replace the metadata with the contents of a text file
    UpdateMetadata {
        /// PDF file to rewrite
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Text file with one key|value entry per line
        #[arg(value_name = "FILE")]
        metadata: PathBuf,
    },

    /// Extract embedded (attached) files into a directory
    SaveAttachments {
        /// Source PDF file
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },

    /// Remove all embedded (attached) files
    RemoveAttachments {
        /// PDF file to rewrite
        #[arg(value_name = "PDF")]
        pdf: PathBuf,
    },

    /// Attach files to the PDF
    AddAttachments {
        /// PDF file to rewrite
        #[arg(value_name = "PDF")]
        pdf: PathBuf,

        /// Files to attach
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Show document information
    Info {
        /// Source PDF file
        #[arg(value_name = "PDF")]
        pdf: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> pdfmeta::Result<()> {
    match command {
        Commands::SaveOutlines { pdf, output } => {
            pdfmeta::save_outlines(&pdf, &output)?;
            println!("Saved outlines to {}", output.display());
        }
        Commands::UpdateOutlines { pdf, outlines } => {
            pdfmeta::update_outlines(&pdf, &outlines)?;
            println!("Updated outlines in {}", pdf.display());
        }
        Commands::SaveMetadata { pdf, output } => {
            pdfmeta::save_metadata(&pdf, &output)?;
            println!("Saved metadata to {}", output.display());
        }
        Commands::UpdateMetadata { pdf, metadata } => {
            pdfmeta::update_metadata(&pdf, &metadata)?;
            println!("Updated metadata in {}", pdf.display());
        }
        Commands::SaveAttachments { pdf, output } => {
            pdfmeta::save_attachments(&pdf, &output)?;
            println!("Saved attachments to {}", output.display());
        }
        Commands::RemoveAttachments { pdf } => {
            pdfmeta::remove_attachments(&pdf)?;
            println!("Removed attachments from {}", pdf.display());
        }
        Commands::AddAttachments { pdf, files } => {
            pdfmeta::add_attachments(&pdf, &files)?;
            println!("Attached {} file(s) to {}", files.len(), pdf.display());
        }
        Commands::Info { pdf } => {
            cmd_info(&pdf)?;
        }
    }
    Ok(())
}

fn cmd_info(path: &std::path::Path) -> pdfmeta::Result<()> {
    let file = PdfFile::open(path)?;

    println!("{}: {}", "File".bold(), path.display());
    println!("{}: {}", "PDF version".bold(), file.version());
    println!("{}: {}", "Pages".bold(), file.page_count());

    let outline = file.outline();
    let bookmarks: usize = outline.iter().map(|n| n.subtree_len()).sum();
    println!("{}: {}", "Bookmarks".bold(), bookmarks);
    println!("{}: {}", "Attachments".bold(), file.attachments().len());

    let metadata = file.metadata();
    if !metadata.is_empty() {
        println!("{}:", "Metadata".bold());
        for (key, value) in &metadata {
            println!("  {}: {}", key, value);
        }
    }

    Ok(())
}
