use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use toyc::{BackendType, CompileError, CompileOptions, Pipeline};

#[derive(Parser)]
#[command(name = "toyc")]
#[command(about = "Toy-language front end: tokens, three-address code and accumulator assembly", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a source file and print tokens, TAC and assembly
    Compile {
        /// Source file
        input: PathBuf,

        /// Target backend
        #[arg(short, long, default_value = "acc")]
        target: String,

        /// Also write the assembly listing to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Parse to an AST first and translate it in a separate pass
        #[arg(long)]
        tree: bool,

        /// Print the symbol table after the TAC
        #[arg(long)]
        show_symbols: bool,

        /// Print the AST (implies --tree)
        #[arg(long)]
        show_ast: bool,

        /// Progress messages on stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print only the token stream
    Lex {
        /// Source file
        input: PathBuf,
    },

    /// Parse without translating and print the AST
    Parse {
        /// Source file
        input: PathBuf,
    },

    /// List supported targets
    Targets,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Compile { input, target, output, tree, show_symbols, show_ast, verbose } => {
            let Some(target) = BackendType::by_name(&target) else {
                return Err(format!("unknown target: {} (see `toyc targets`)", target).into());
            };
            let options = CompileOptions {
                pipeline: if tree || show_ast { Pipeline::Tree } else { Pipeline::Direct },
                target,
            };

            if verbose {
                eprintln!("Compiling {} for {} ({:?} pipeline)...", input.display(), target.name(), options.pipeline);
            }
            let source = read_source(&input)?;

            if show_ast {
                let program = toyc::parser::parse(&source)?;
                println!("=== AST ===");
                println!("{:#?}", program);
            }

            let unit = toyc::compile(&source, &options)?;

            println!("=== TOKENS ===");
            for token in &unit.tokens {
                println!("{}", token);
            }
            println!("=== TAC ===");
            for instruction in &unit.code {
                println!("{}", instruction);
            }
            if show_symbols {
                println!("=== SYMBOLS ===");
                print!("{}", unit.symbols);
            }
            println!("=== ASSEMBLY ===");
            for line in &unit.assembly {
                println!("{}", line);
            }

            if let Some(path) = output {
                let mut listing = unit.assembly.join("\n");
                listing.push('\n');
                fs::write(&path, listing).map_err(CompileError::from)?;
                if verbose {
                    eprintln!("Assembly written to: {}", path.display());
                }
            }

            if verbose {
                eprintln!(
                    "{} tokens, {} symbols, {} TAC instructions, {} assembly lines",
                    unit.tokens.len(),
                    unit.symbols.len(),
                    unit.code.len(),
                    unit.assembly.len()
                );
            }
        }
        Commands::Lex { input } => {
            let source = read_source(&input)?;
            for token in toyc::parser::lexer::tokenize(&source)? {
                println!("{}", token);
            }
        }
        Commands::Parse { input } => {
            let source = read_source(&input)?;
            let program = toyc::parser::parse(&source)?;
            println!("{:#?}", program);
        }
        Commands::Targets => {
            println!("Supported targets:");
            for backend in BackendType::all() {
                println!("  {:8} - {}", backend.name(), backend.description());
            }
        }
    }

    Ok(())
}

fn read_source(path: &Path) -> Result<String, CompileError> {
    Ok(fs::read_to_string(path)?)
}
