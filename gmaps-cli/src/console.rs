use crate::render::collect_turn;
use anyhow::Result;
use gmaps_runner::Runner;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Reads requests line by line until Ctrl+C or EOF. Session state carries
/// across lines; a failed turn is reported and the loop continues.
pub async fn run_console(runner: &Runner, user_id: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("Google Maps agents");
    println!("Agent: {}", runner.root_agent().name());
    println!("Type your request and press Enter. Ctrl+C to exit.\n");

    loop {
        match rl.readline("User -> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                let output = match runner.run(user_id, line).await {
                    Ok(events) => collect_turn(events).await,
                    Err(e) => {
                        eprintln!("\nError: {}\n", e);
                        continue;
                    }
                };

                for target in &output.transfers {
                    println!("  (→ {})", target);
                }
                if let Some(answer) = &output.answer {
                    println!("\nAgent -> {}\n", answer);
                }
                if let Some(e) = &output.error {
                    eprintln!("\nError: {}\n", e);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("EOF");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    Ok(())
}
