//! Subcommand handlers.
//!
//! Handlers print user-facing output and return a message on failure;
//! `main` turns that into the exit code.

use btl_core::{
    render_progress_bar, NewTaskRequest, Priority, TaskId, TaskRepository, TaskService,
};

pub type CommandResult = Result<(), String>;

pub fn add<R: TaskRepository>(
    service: &TaskService<R>,
    title: String,
    notes: String,
    priority: &str,
    keep: bool,
) -> CommandResult {
    let request = NewTaskRequest {
        title,
        notes,
        priority: Priority::from_label(priority).unwrap_or_default(),
        keep,
    };
    let task = service
        .add_task(request)
        .map_err(|err| format!("failed to add task: {err}"))?;

    println!(
        "Added task {}: {} (Priority: {})",
        task.id, task.title, task.priority
    );
    if task.delete_by_eod {
        println!("Note: This task will be deleted at end of day. Use --keep flag to preserve it.");
    }
    Ok(())
}

pub fn list<R: TaskRepository>(service: &TaskService<R>) -> CommandResult {
    let tasks = service.list_tasks();
    if tasks.is_empty() {
        println!("No tasks found");
        return Ok(());
    }

    println!("\nTasks:");
    println!("-------");
    for task in &tasks {
        let status = if task.completed { "[✓]" } else { "[ ]" };
        println!(
            "{status} #{}: {} (Priority: {})",
            task.id, task.title, task.priority
        );
        if !task.notes.is_empty() {
            println!("    Notes: {}", task.notes);
        }
    }
    println!();
    Ok(())
}

pub fn complete<R: TaskRepository>(service: &TaskService<R>, raw_id: &str) -> CommandResult {
    let id = parse_id(raw_id).ok_or_else(|| format!("invalid task ID: {raw_id}"))?;
    service
        .complete_task(id)
        .map_err(|err| format!("failed to update task: {err}"))?;

    println!("Marked task {id} as completed");
    Ok(())
}

/// Deletes every valid id and reports invalid or missing ones together.
pub fn delete<R: TaskRepository>(service: &TaskService<R>, raw_ids: &[String]) -> CommandResult {
    let report = delete_each(service, raw_ids);
    for id in &report.deleted {
        println!("Deleted task {id}");
    }
    report.into_result()
}

/// Per-argument result of a `delete` invocation.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub deleted: Vec<TaskId>,
    /// One entry per failed argument, in argument order.
    pub failures: Vec<String>,
}

impl DeleteReport {
    pub fn into_result(self) -> CommandResult {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(format!(
            "failed to delete some tasks: {}",
            self.failures.join(", ")
        ))
    }
}

/// Processes `raw_ids` in order; a bad argument never stops the rest.
pub fn delete_each<R: TaskRepository>(service: &TaskService<R>, raw_ids: &[String]) -> DeleteReport {
    let mut report = DeleteReport::default();
    for raw in raw_ids {
        let Some(id) = parse_id(raw) else {
            report.failures.push(format!("{raw} (invalid ID)"));
            continue;
        };
        match service.delete_task(id) {
            Ok(()) => report.deleted.push(id),
            Err(err) => report.failures.push(format!("{id} ({err})")),
        }
    }
    report
}

pub fn stats<R: TaskRepository>(service: &TaskService<R>) -> CommandResult {
    let collector = service.stats();
    let overall = collector.overall_stats();

    println!("\nOverall Statistics:");
    println!("Total Tasks: {}", overall.total);
    println!("Completed:   {}", overall.completed);
    println!(
        "Progress:    {}\n",
        render_progress_bar(overall.completed, overall.total)
    );

    let daily = collector.daily_stats();
    if !daily.is_empty() {
        println!("Daily Statistics:");
        for (date, day) in daily {
            println!("\n{date}:");
            println!("  Tasks:      {} (Completed: {})", day.total, day.completed);
            println!(
                "  Progress:   {}",
                render_progress_bar(day.completed, day.total)
            );
        }
    }
    Ok(())
}

fn parse_id(raw: &str) -> Option<TaskId> {
    raw.trim().parse::<TaskId>().ok().filter(|id| *id > 0)
}
