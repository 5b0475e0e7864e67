use colored::*;
use std::io::Write;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.chars().count()).bright_cyan());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_prompt(text: &str) {
    print!("{}", text.yellow().bold());
    let _ = std::io::stdout().flush();
}

/// Line spoken by an agent
pub fn print_agent_reply(agent: &str, text: &str) {
    println!("{} {}", format!("[{}]", agent).green().bold(), text);
}

pub fn print_tool_step(tool: &str, output: &str) {
    println!("  {} {} {}", "⚙".dimmed(), tool.magenta(), output.dimmed());
}

pub fn print_handoff(from: &str, to: &str) {
    println!("  {}", format!("↪ {} → {}", from, to).bright_cyan());
}
