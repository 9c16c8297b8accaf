mod cli;

use anyhow::Result;
use clap::Parser;
use simple_logger::SimpleLogger;

use versefill::{answers, pages, populate, scaffold, server, store::Library};

use cli::{Cli, Command};

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .with_colors(true)
        .without_timestamps()
        .init()
        .unwrap();
    let args = Cli::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1)
    }
}

fn run(args: Cli) -> Result<()> {
    match args.command {
        Command::Answers => {
            let library = Library::load(&args.site_dir.join("data"));
            let summary = answers::generate(&args.site_dir, &library)?;
            println!(
                "Wrote {} answer files: {} answers resolved, {} left without data",
                summary.files, summary.resolved, summary.unresolved
            );
        }

        Command::Scaffold { pages_dir } => {
            let pages_dir = args.site_dir.join(pages_dir);
            let answers_dir = pages_dir.join("data").join("answers");
            let created = scaffold::scaffold(&pages_dir, &answers_dir)?;
            println!("Scaffolded {created} placeholder answer files");
        }

        Command::Populate { one2one_dir } => {
            let index = populate::build_index(&args.site_dir.join("data").join("answers"))?;
            let one2one_answers = args.site_dir.join(one2one_dir).join("data").join("answers");
            let summary = populate::populate(&one2one_answers, &index)?;
            println!(
                "Filled {} refs across {} files",
                summary.matched, summary.files_updated
            );
        }

        Command::Pages => {
            let written = pages::generate(&args.site_dir)?;
            println!("Rendered {written} pages");
        }

        Command::Serve { port } => {
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(server::serve(args.site_dir, port))?;
        }
    }
    Ok(())
}
