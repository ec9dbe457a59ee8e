//! Mermaid diagram rendering through the external `mmdc` CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

const SYSTEM_FLOW: &str = r#"
graph TB
    subgraph "Client Layer"
        A[Task Submission] --> B[SwarmCoordinator]
    end

    subgraph "Coordination Layer"
        B --> C[Task Queue]
        B --> D[Worker Registry]
        B --> E[Result Processor]
    end

    subgraph "Worker Pool"
        F[Document Processor<br/>Worker 1]
        G[ML Inference<br/>Worker 2]
        H[Vector Indexer<br/>Worker N]
    end

    subgraph "Task Processing"
        I[Echo Tasks<br/>100ms]
        J[Compute Tasks<br/>200ms]
        K[Error Tasks<br/>50ms]
    end

    C --> F
    C --> G
    C --> H

    F --> I
    G --> J
    H --> K

    I --> E
    J --> E
    K --> E

    E --> L[Task Results]

    style A fill:#e1f5fe
    style B fill:#f3e5f5
    style F fill:#e8f5e8
    style G fill:#e8f5e8
    style H fill:#e8f5e8
    style L fill:#fff3e0
"#;

const TASK_FLOW: &str = r#"
sequenceDiagram
    participant Client
    participant Coordinator
    participant Worker1
    participant Worker2
    participant Results

    Client->>Coordinator: Submit Task 1 (Echo)
    Client->>Coordinator: Submit Task 2 (Compute)
    Client->>Coordinator: Submit Task 3 (Error)

    Coordinator->>Worker1: Distribute Task 1
    Coordinator->>Worker2: Distribute Task 2
    Coordinator->>Worker1: Distribute Task 3

    Worker1->>Worker1: Process Echo (100ms)
    Worker2->>Worker2: Process Compute (200ms)
    Worker1->>Worker1: Process Error (50ms)

    Worker1->>Results: Task 1 Complete
    Worker2->>Results: Task 2 Complete
    Worker1->>Results: Task 3 Failed

    Results->>Coordinator: Report Results
    Coordinator->>Client: All Tasks Processed
"#;

/// Errors from a single render attempt
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("'{program}' exited with {status}")]
    Exited { program: String, status: ExitStatus },

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Image format produced by the renderer, picked by output extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        }
    }
}

/// A fixed Mermaid definition and where its image goes
#[derive(Debug, Clone, Copy)]
pub struct DiagramSpec {
    pub title: &'static str,
    pub file_stem: &'static str,
    pub definition: &'static str,
}

/// The system flow chart and the task flow sequence, in render order
pub fn builtin_diagrams() -> [DiagramSpec; 2] {
    [
        DiagramSpec {
            title: "System Flow Diagram",
            file_stem: "system_flow",
            definition: SYSTEM_FLOW,
        },
        DiagramSpec {
            title: "Task Flow Sequence",
            file_stem: "task_flow",
            definition: TASK_FLOW,
        },
    ]
}

/// Name of the intermediate definition file for a diagram title
pub fn temp_file_name(title: &str) -> String {
    format!("temp_{}.mmd", title.to_lowercase().replace(' ', "_"))
}

/// Renderer invocation: `<program> [prefix args] -i IN -o OUT -t THEME -b BG`
#[derive(Debug, Clone)]
pub struct MermaidCli {
    pub program: String,
    /// Arguments placed before the render flags (e.g. `npx -p ... mmdc`)
    pub prefix_args: Vec<String>,
    pub theme: String,
    pub background: String,
}

impl Default for MermaidCli {
    fn default() -> Self {
        Self {
            program: "mmdc".to_string(),
            prefix_args: Vec::new(),
            theme: "default".to_string(),
            background: "white".to_string(),
        }
    }
}

impl MermaidCli {
    /// Build from a whitespace separated command line such as `npx mmdc`.
    /// An empty command falls back to `mmdc`.
    pub fn from_command_line(command: &str) -> Self {
        let mut parts = command.split_whitespace().map(str::to_string);
        match parts.next() {
            Some(program) => Self {
                program,
                prefix_args: parts.collect(),
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.prefix_args);
        cmd
    }

    /// True when `<renderer> --version` runs and exits zero
    pub fn is_available(&self) -> bool {
        match self
            .command()
            .arg("--version")
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => {
                tracing::debug!(
                    program = %self.program,
                    version = %String::from_utf8_lossy(&output.stdout).trim(),
                    status = %output.status,
                    "renderer version check"
                );
                output.status.success()
            }
            Err(e) => {
                tracing::debug!(program = %self.program, error = %e, "renderer not found");
                false
            }
        }
    }

    /// Rasterize one definition file, blocking until the renderer exits
    pub fn render(&self, input: &Path, output: &Path) -> Result<(), RenderError> {
        let mut cmd = self.command();
        cmd.arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .arg("-t")
            .arg(&self.theme)
            .arg("-b")
            .arg(&self.background)
            .stdin(Stdio::null());
        tracing::debug!(command = ?cmd, "running renderer");

        let status = cmd.status().map_err(|source| RenderError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(RenderError::Exited {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// One-shot installation command for the renderer
#[derive(Debug, Clone)]
pub struct Installer {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for Installer {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            args: ["install", "-g", "@mermaid-js/mermaid-cli"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Installer {
    pub fn run(&self) -> Result<(), RenderError> {
        tracing::info!(program = %self.program, args = ?self.args, "installing renderer");
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| RenderError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !status.success() {
            return Err(RenderError::Exited {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Definition file that is deleted when dropped
struct TempDefinition {
    path: PathBuf,
}

impl TempDefinition {
    fn create(dir: &Path, title: &str, definition: &str) -> Result<Self, RenderError> {
        let path = dir.join(temp_file_name(title));
        fs::write(&path, definition).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDefinition {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove temp file");
            }
        }
    }
}

/// Render one diagram into `output_dir`, returning the image path
pub fn render_diagram(
    cli: &MermaidCli,
    spec: &DiagramSpec,
    output_dir: &Path,
    format: ImageFormat,
) -> Result<PathBuf, RenderError> {
    let output = output_dir.join(format!("{}.{}", spec.file_stem, format.extension()));
    let temp = TempDefinition::create(output_dir, spec.title, spec.definition)?;
    cli.render(temp.path(), &output)?;
    Ok(output)
}

/// Outcome of a diagram run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    pub succeeded: usize,
    pub total: usize,
}

/// Render every built-in diagram, installing the renderer first if needed.
///
/// A missing renderer that cannot be installed is not an error: the run
/// reports zero successes. Only an unusable output directory aborts.
pub fn generate_diagrams(
    cli: &MermaidCli,
    installer: Option<&Installer>,
    output_dir: &Path,
    format: ImageFormat,
) -> Result<RenderReport> {
    let diagrams = builtin_diagrams();
    let total = diagrams.len();

    println!("🚀 Aprio Swarm System - Diagram Generator");
    println!("{}", "=".repeat(50));

    if !cli.is_available() {
        println!("⚠️  Mermaid CLI not found. Installing...");
        if !try_install(installer) {
            println!("\n📋 Manual Installation Instructions:");
            println!("1. Install Node.js: https://nodejs.org/");
            println!("2. Run: npm install -g @mermaid-js/mermaid-cli");
            println!("3. Run this script again");
            println!("\n🎉 Generated 0/{} diagrams successfully!", total);
            return Ok(RenderReport {
                succeeded: 0,
                total,
            });
        }
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let mut succeeded = 0;
    for spec in &diagrams {
        println!("🎨 Generating {}...", spec.title);
        match render_diagram(cli, spec, output_dir, format) {
            Ok(path) => {
                println!("✅ {} saved as {}", spec.title, path.display());
                succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(diagram = spec.title, error = %e, "render failed");
                println!("❌ Failed to generate {}: {}", spec.title, e);
            }
        }
    }

    println!("\n🎉 Generated {}/{} diagrams successfully!", succeeded, total);
    println!("📁 Diagrams saved in {}/", output_dir.display());
    println!("\n💡 You can now:");
    println!("  - View diagrams in {}/", output_dir.display());
    println!("  - Include images in presentations or documentation");

    Ok(RenderReport { succeeded, total })
}

fn try_install(installer: Option<&Installer>) -> bool {
    let Some(installer) = installer else {
        println!("❌ Automatic installation disabled.");
        return false;
    };

    println!("📦 Installing Mermaid CLI...");
    match installer.run() {
        Ok(()) => {
            println!("✅ Mermaid CLI installed successfully!");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "renderer installation failed");
            println!("❌ Failed to install Mermaid CLI. Please install Node.js and npm first.");
            false
        }
    }
}
