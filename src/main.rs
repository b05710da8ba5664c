// src/main.rs

#![cfg_attr(all(not(debug_assertions), target_os = "windows"), windows_subsystem = "windows")]

use bevy::{
    log::LogPlugin,
    prelude::*,
    window::WindowPlugin,
    winit::{UpdateMode, WinitSettings},
};
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;

use bevy_egui::EguiPlugin;
use bevy_tokio_tasks::TokioTasksPlugin;

mod cli;
mod gateway;
mod outreach;
mod settings;
mod ui;

use cli::Cli;
use outreach::OutreachPlugin;
use settings::ResolvedSettings;
use ui::OutreachUiPlugin;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let resolved = settings::resolve_settings(cli.api_base.clone());

    match cli.command {
        Some(command) => {
            if let Some(message) = &resolved.load_error {
                eprintln!("Warning: {}", message);
            }
            match cli::run(command, &resolved.settings) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        None => run_window(resolved),
    }
}

fn run_window(resolved: ResolvedSettings) -> ExitCode {
    let exit = App::new()
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::Continuous,
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_secs_f32(1.0 / 5.0)),
        })
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Sheet Mailer".into(),
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: bevy::log::Level::INFO,
                    filter: "wgpu=error,naga=warn,bevy_tokio_tasks=warn".to_string(),
                    ..default()
                }),
        )
        .add_plugins(EguiPlugin {
            enable_multipass_for_primary_context: true,
        })
        .add_plugins(TokioTasksPlugin::default())
        .add_plugins(OutreachPlugin {
            settings: resolved.settings,
            settings_load_error: resolved.load_error,
        })
        .add_plugins(OutreachUiPlugin)
        .run();

    match exit {
        AppExit::Success => ExitCode::SUCCESS,
        AppExit::Error(_) => ExitCode::FAILURE,
    }
}
