use crate::BuildError;
use crate::config::BuildConfig;
use crate::monitor::BuildMonitor;
use crate::pump::StreamPump;
use crate::queue::event_queue;
use chrono::{DateTime, Local};
use pioview_log::RenderEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::str::FromStr;
use std::thread;

/// The PlatformIO actions pioview knows how to launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildType {
    AutoBuild,
    Build,
    Clean,
    Debug,
    Program,
    Remote,
    Test,
    Traceback,
    Upload,
}

impl BuildType {
    pub const ALL: [BuildType; 9] = [
        BuildType::AutoBuild,
        BuildType::Build,
        BuildType::Clean,
        BuildType::Debug,
        BuildType::Program,
        BuildType::Remote,
        BuildType::Test,
        BuildType::Traceback,
        BuildType::Upload,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildType::AutoBuild => "auto-build",
            BuildType::Build => "build",
            BuildType::Clean => "clean",
            BuildType::Debug => "debug",
            BuildType::Program => "program",
            BuildType::Remote => "remote",
            BuildType::Test => "test",
            BuildType::Traceback => "traceback",
            BuildType::Upload => "upload",
        }
    }

    /// PlatformIO subcommand and flags for this action, without the environment.
    pub fn tool_args(self) -> Vec<&'static str> {
        match self {
            BuildType::AutoBuild | BuildType::Build => vec!["run"],
            BuildType::Clean | BuildType::Program | BuildType::Traceback | BuildType::Upload => {
                vec!["run", "--target", self.as_str()]
            }
            BuildType::Test => vec!["test", "upload"],
            BuildType::Remote => vec!["remote", "run", "--target", "program"],
            BuildType::Debug => vec!["debug"],
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BuildType::ALL
            .into_iter()
            .find(|build_type| build_type.as_str() == s)
            .ok_or_else(|| BuildError::UnknownBuildType(s.to_string()))
    }
}

/// One requested PlatformIO run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub build_type: BuildType,
    /// PlatformIO environment name (`-e`).
    pub environment: String,
    /// Shown in the trailer; falls back to the configured board.
    pub board_name: Option<String>,
}

impl BuildRequest {
    pub fn new(build_type: BuildType, environment: impl Into<String>) -> Self {
        Self {
            build_type,
            environment: environment.into(),
            board_name: None,
        }
    }

    pub fn with_board(mut self, board_name: impl Into<String>) -> Self {
        self.board_name = Some(board_name.into());
        self
    }

    /// Full argument list passed to the PlatformIO executable.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self
            .build_type
            .tool_args()
            .into_iter()
            .map(String::from)
            .collect();
        args.push("-e".to_string());
        args.push(self.environment.clone());
        args
    }
}

/// Build information appended below the tool output once the stream closes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTrailer {
    pub board_name: String,
    pub build_type: BuildType,
    pub environment: String,
}

impl BuildTrailer {
    pub fn new(request: &BuildRequest, config: &BuildConfig) -> Self {
        let board_name = request
            .board_name
            .clone()
            .or_else(|| config.board_name.clone())
            .unwrap_or_else(|| "unknown".to_string());
        Self {
            board_name,
            build_type: request.build_type,
            environment: request.environment.clone(),
        }
    }

    pub fn events(&self, finished_at: DateTime<Local>) -> Vec<RenderEvent> {
        vec![
            RenderEvent::normal(format!("\nBoard name: {}\n", self.board_name)),
            RenderEvent::normal(format!("Build type: {}\n", self.build_type)),
            RenderEvent::normal(format!("Environment used: {}\n", self.environment)),
            RenderEvent::normal(format!(
                "{}\n",
                finished_at.format("%Y-%m-%d %H:%M:%S%.6f")
            )),
        ]
    }
}

/// A running tool: its merged output stream and, for real processes, the child.
pub struct SpawnedOutput {
    pub reader: Box<dyn Read + Send>,
    pub child: Option<Child>,
}

/// Starts the build tool and exposes its combined stdout/stderr.
///
/// This is the seam that lets tests replay canned output instead of running
/// PlatformIO.
pub trait OutputSource: Send + Sync + fmt::Debug {
    fn spawn(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> Result<SpawnedOutput, BuildError>;
}

/// Default [`OutputSource`]: a real child process with stderr folded into stdout.
#[derive(Debug)]
pub struct ProcessSource;

impl OutputSource for ProcessSource {
    fn spawn(
        &self,
        program: &str,
        args: &[String],
        working_dir: Option<&Path>,
    ) -> Result<SpawnedOutput, BuildError> {
        let spawn_err = |source| BuildError::Spawn {
            program: program.to_string(),
            source,
        };
        let (reader, writer) = std::io::pipe().map_err(spawn_err)?;
        let stderr_writer = writer.try_clone().map_err(spawn_err)?;

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(stderr_writer);
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }
        let child = command.spawn().map_err(spawn_err)?;
        // The command still holds the write ends; the reader only sees EOF once
        // they are gone and the child has exited.
        drop(command);

        Ok(SpawnedOutput {
            reader: Box::new(reader),
            child: Some(child),
        })
    }
}

/// Launches PlatformIO for `request` and starts pumping its output.
///
/// A rebuild is just another call: the previous run is left to finish on its
/// own thread.
pub fn start_build(
    request: &BuildRequest,
    config: &BuildConfig,
    source: &dyn OutputSource,
) -> Result<BuildMonitor, BuildError> {
    let args = request.args();
    log::info!("build_type: {}", request.build_type);
    log::info!("starting {}", config.program);
    log::debug!("{} args: {:?}", config.program, args);

    let SpawnedOutput { reader, mut child } =
        source.spawn(&config.program, &args, config.working_dir.as_deref())?;
    let trailer = BuildTrailer::new(request, config);
    let program = config.program.clone();
    let (sender, receiver) = event_queue();

    let producer = thread::Builder::new()
        .name("pioview-pump".into())
        .spawn(move || {
            let outcome = StreamPump::new(BufReader::new(reader), sender.clone()).run();
            sender.push_all(trailer.events(Local::now()));

            if let Some(child) = child.as_mut() {
                match child.wait() {
                    Ok(status) => log::info!("{program} finished: {status}"),
                    Err(e) => log::warn!("failed to wait for {program}: {e}"),
                }
            }
            outcome.map_err(BuildError::from)
        })
        .map_err(BuildError::Thread)?;

    Ok(BuildMonitor::new(receiver, producer))
}
