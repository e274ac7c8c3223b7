//! Command implementations behind the `kino` binary.
//!
//! Every command loads the project file, works on the entry files it
//! finds and prints a short summary to the given writer. Progress and
//! per-entry detail go through `tracing`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use kino_build::{
    BuildOrchestrator, BuildTarget, Entry, EntryKind, EntryValidator, IdAllocator, IdPolicy,
    PROJECT_FILE_NAME, Project, UnitySceneInspector, assign_ids, refresh_objects,
};
use kino_pack::{Container, ContainerHeader, ContainerWriter};
use sha2::{Digest, Sha256};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "kino")]
#[command(about = "Validate and build Kino content packs, garages and maps")]
pub struct Cli {
    /// Path to the project file
    #[arg(short, long, global = true, default_value = PROJECT_FILE_NAME)]
    pub project: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate every selected entry without building
    Check(Selection),

    /// Give new entries and parts their ids and save them
    AssignIds {
        /// Regenerate content ids that are already set
        #[arg(long)]
        force_entries: bool,

        /// Regenerate part ids that are already set
        #[arg(long)]
        force_parts: bool,
    },

    /// Add new prefabs found next to custom objects packs
    Refresh,

    /// Build selected entries into containers
    Build {
        /// Target platform
        #[arg(short, long, default_value = "StandaloneWindows64")]
        target: BuildTarget,

        #[command(flatten)]
        selection: Selection,
    },

    /// Print the header of a built container
    Inspect {
        /// Container file
        file: PathBuf,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct Selection {
    /// Only these entries, ignoring their selected flag
    #[arg(long, value_name = "NAME")]
    pub only: Vec<String>,
}

impl Selection {
    /// Applies `--only` to the selected flags of `entries`.
    pub fn apply(&self, entries: &mut [Entry]) -> Result<()> {
        if self.only.is_empty() {
            return Ok(());
        }

        for name in &self.only {
            if !entries.iter().any(|e| &e.name == name) {
                bail!("no entry named '{name}'");
            }
        }
        for entry in entries {
            entry.selected_to_build = self.only.contains(&entry.name);
        }
        Ok(())
    }
}

/// Runs one command. Returns `Ok(false)` when the command ran but some
/// entries failed to build.
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<bool> {
    match &cli.command {
        Command::Check(selection) => {
            let (project, entries) = load(&cli.project)?;
            let (mut entries, _) = save_ids(&project, entries, IdPolicy::default())?;
            selection.apply(&mut entries)?;
            let scenes = UnitySceneInspector::new(project.root());
            EntryValidator::new(&scenes)
                .validate_all(project.author(), &entries)
                .context("Validation failed")?;
            let selected = entries.iter().filter(|e| e.selected_to_build).count();
            writeln!(out, "{selected} entries valid")?;
            Ok(true)
        }
        Command::AssignIds {
            force_entries,
            force_parts,
        } => {
            let (project, entries) = load(&cli.project)?;
            let policy = IdPolicy {
                force_entries: *force_entries,
                force_parts: *force_parts,
            };
            let (entries, changed) = save_ids(&project, entries, policy)?;
            for &index in &changed {
                writeln!(out, "{} {}", entries[index].id, entries[index].name)?;
            }
            writeln!(out, "{} entries updated", changed.len())?;
            Ok(true)
        }
        Command::Refresh => {
            let (project, mut entries) = load(&cli.project)?;
            let mut total = 0;
            for entry in &mut entries {
                let root = entry.root.clone();
                let EntryKind::CustomObjects(pack) = &mut entry.kind else {
                    continue;
                };
                let added = refresh_objects(pack, project.root(), &root)
                    .with_context(|| format!("Failed to refresh '{}'", entry.name))?;
                if added > 0 {
                    project.save_entry(entry)?;
                    writeln!(out, "{}: {added} new objects", entry.name)?;
                    total += added;
                }
            }
            writeln!(out, "{total} objects added")?;
            Ok(true)
        }
        Command::Build { target, selection } => {
            let (project, entries) = load(&cli.project)?;
            let (mut entries, _) = save_ids(&project, entries, IdPolicy::default())?;
            selection.apply(&mut entries)?;
            build(&project, *target, &entries, out)
        }
        Command::Inspect { file } => inspect(file, out),
    }
}

fn load(path: &Path) -> Result<(Project, Vec<Entry>)> {
    let project = Project::load(path)
        .with_context(|| format!("Failed to load project {}", path.display()))?;
    let entries = project
        .discover_entries()
        .context("Failed to read entry files")?;
    info!("Found {} entries", entries.len());
    Ok((project, entries))
}

/// Assigns missing ids and saves every entry that changed. Returns the
/// entries and the indices of the saved ones.
fn save_ids(
    project: &Project,
    entries: Vec<Entry>,
    policy: IdPolicy,
) -> Result<(Vec<Entry>, Vec<usize>)> {
    let before = entries.clone();
    let entries = assign_ids(entries, &IdAllocator::system(), policy);

    let mut changed = Vec::new();
    for (index, (old, new)) in before.iter().zip(&entries).enumerate() {
        if old != new {
            project
                .save_entry(new)
                .with_context(|| format!("Failed to save ids of '{}'", new.name))?;
            changed.push(index);
        }
    }
    if !changed.is_empty() {
        info!("Saved ids of {} entries", changed.len());
    }
    Ok((entries, changed))
}

fn build(
    project: &Project,
    target: BuildTarget,
    entries: &[Entry],
    out: &mut impl Write,
) -> Result<bool> {
    let orchestrator = BuildOrchestrator::new(
        project.root(),
        project.compiler(),
        Box::new(UnitySceneInspector::new(project.root())),
    )
    .with_writer(ContainerWriter::new(project.write_mode()));

    let report = orchestrator
        .build(target, &project.build_metas(), project.author(), entries)
        .context("Build failed")?;

    for built in &report.built {
        writeln!(
            out,
            "built  {:<24} {:>10} bytes  {}  {}",
            built.name,
            built.bytes,
            built.sha256,
            built.output.display()
        )?;
    }
    for failure in &report.failed {
        writeln!(out, "failed {:<24} {}", failure.name, failure.error)?;
    }
    for name in &report.cancelled {
        writeln!(out, "skipped {name}")?;
    }
    writeln!(
        out,
        "{}: {} built, {} failed",
        report.target,
        report.built.len(),
        report.failed.len()
    )?;

    Ok(report.is_success())
}

fn inspect(file: &Path, out: &mut impl Write) -> Result<bool> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let container = Container::decode(&bytes)
        .with_context(|| format!("{} is not a Kino container", file.display()))?;

    writeln!(out, "layout:          {}", container.header.layout())?;
    writeln!(out, "format version:  {}", container.header.tool_format_version())?;
    writeln!(out, "content id:      {}", container.header.content_id())?;
    match &container.header {
        ContainerHeader::Pack(h) => {
            writeln!(out, "content version: {}", h.content_version)?;
            writeln!(out, "kind:            {}", h.kind)?;
            writeln!(out, "steam id:        {}", h.author_steam_id)?;
            writeln!(out, "discord id:      {}", h.author_discord_id)?;
        }
        ContainerHeader::Garage(h) => {
            writeln!(out, "name:            {}", h.content_name)?;
            writeln!(out, "author:          {}", h.author_name)?;
            writeln!(out, "metadata:        {}", h.proxy_json)?;
        }
        ContainerHeader::Map(h) => {
            writeln!(out, "name:            {}", h.content_name)?;
            writeln!(out, "author:          {}", h.author_name)?;
            writeln!(out, "load screen:     {} bytes", h.loadscreen.len())?;
        }
    }
    writeln!(out, "payload:         {} bytes", container.payload.len())?;
    writeln!(out, "sha256:          {}", hex::encode(Sha256::digest(&bytes)))?;
    Ok(true)
}
