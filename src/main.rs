// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use clap::Parser;
use web_browser_lib::cli::Cli;

fn main() {
    let cli = Cli::parse();
    web_browser_lib::run(cli);
}
