//! CLI argument definitions and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use project_tasks::render::{
    render_detail, render_json, render_status_groups, render_table, render_tree,
};
use project_tasks::{Config, ProjectTasks, Task, TaskFilter, TaskSelector, TaskType};

#[derive(Parser, Debug)]
#[command(name = "project-tasks")]
#[command(version, about = "Retrieve tasks and their hierarchy from a GitHub Projects board")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// GitHub token (default: the variable named by github.token_env, GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Config file (default: $PROJECT_TASKS_CONFIG or <config dir>/project-tasks/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all tasks of a project
    List {
        #[command(flatten)]
        project: ProjectArgs,

        /// Only this item type (issue, pull_request, draft_issue)
        #[arg(long = "type", value_parser = parse_task_type)]
        task_type: Option<TaskType>,

        #[command(flatten)]
        filters: FilterArgs,

        /// Include task bodies
        #[arg(long)]
        show_description: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        /// Shorthand for --output tree
        #[arg(long, conflicts_with_all = ["output", "group_by_status"])]
        tree: bool,

        /// Shorthand for --output status-groups
        #[arg(long, conflicts_with = "output")]
        group_by_status: bool,
    },
    /// List the direct children of a task
    Children {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
    /// Show one task with its description and sub-issues
    Show {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        target: TargetArgs,

        #[arg(long, value_enum, default_value_t = DetailFormat::Table)]
        output: DetailFormat,
    },
}

#[derive(Args, Debug)]
pub struct ProjectArgs {
    /// Organization login (default: github.default_org)
    #[arg(long, env = "GITHUB_ORG")]
    pub org: Option<String>,

    /// Project number
    #[arg(long = "project-id")]
    pub project_id: u64,
}

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Status field value
    #[arg(long)]
    pub status: Option<String>,

    /// Assignee login
    #[arg(long)]
    pub assignee: Option<String>,

    /// Label name
    #[arg(long)]
    pub label: Option<String>,
}

impl FilterArgs {
    fn into_filter(self, task_type: Option<TaskType>) -> TaskFilter {
        TaskFilter::default()
            .with_type(task_type)
            .with_status(self.status)
            .with_assignee(self.assignee)
            .with_label(self.label)
    }
}

#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Task content id or project item id
    #[arg(long, conflicts_with = "task_number")]
    pub task_id: Option<String>,

    /// Issue or pull request number
    #[arg(long)]
    pub task_number: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Tree,
    Json,
    StatusGroups,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailFormat {
    Table,
    Json,
}

fn parse_task_type(value: &str) -> Result<TaskType, String> {
    value.parse().map_err(|e: project_tasks::ProjectError| e.to_string())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => {
            anyhow::ensure!(path.exists(), "config file {} not found", path.display());
            Config::load_from(Some(path))
        }
        None => Config::load(),
    }
}

/// Run one command and return what should be printed on stdout
pub async fn run(cli: Cli) -> Result<String> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::List {
            project,
            task_type,
            filters,
            show_description,
            output,
            tree,
            group_by_status,
        } => {
            let org = config.resolve_org(project.org.as_deref())?;
            let output = if tree {
                OutputFormat::Tree
            } else if group_by_status {
                OutputFormat::StatusGroups
            } else {
                output
            };
            let filter = filters.into_filter(task_type);
            let include_body = show_description || output == OutputFormat::Json;

            let tasks = ProjectTasks::connect(&config, cli.token)?;
            let list = tasks
                .list_tasks(&org, project.project_id, &filter, include_body)
                .await?;

            render_tasks(output, &list, &list.project, &list.tasks, show_description)
        }
        Command::Children {
            project,
            target,
            filters,
            output,
        } => {
            let org = config.resolve_org(project.org.as_deref())?;
            let selector = TaskSelector::from_options(target.task_id, target.task_number)?;
            let filter = filters.into_filter(None);

            let tasks = ProjectTasks::connect(&config, cli.token)?;
            let children = tasks
                .get_children(&org, project.project_id, &selector, &filter)
                .await?;

            if output != OutputFormat::Json {
                tracing::info!(
                    parent = %children.parent_task.title,
                    total = children.total_children,
                    "children of task"
                );
            }
            render_tasks(output, &children, &children.project, &children.child_tasks, false)
        }
        Command::Show {
            project,
            target,
            output,
        } => {
            let org = config.resolve_org(project.org.as_deref())?;
            let selector = TaskSelector::from_options(target.task_id, target.task_number)?;

            let tasks = ProjectTasks::connect(&config, cli.token)?;
            let detail = tasks
                .get_task_detail(&org, project.project_id, &selector)
                .await?;

            Ok(match output {
                DetailFormat::Table => render_detail(&detail),
                DetailFormat::Json => render_json(&detail)? + "\n",
            })
        }
    }
}

fn render_tasks<T: serde::Serialize>(
    output: OutputFormat,
    whole: &T,
    project: &project_tasks::ProjectMeta,
    tasks: &[Task],
    show_description: bool,
) -> Result<String> {
    Ok(match output {
        OutputFormat::Table => render_table(project, tasks, show_description),
        OutputFormat::Tree => render_tree(project, tasks, show_description),
        OutputFormat::StatusGroups => render_status_groups(project, tasks, show_description),
        OutputFormat::Json => render_json(whole)? + "\n",
    })
}
