//! Change and failure notice composition.

use std::fmt;

use handlebars::Handlebars;
use serde::Serialize;

use crate::tasks::TaskList;

/// Marker text used when the task list is empty.
const NO_TASKS: &str = "No tasks.";

/// Composes the notice texts delivered to subscribers.
///
/// The default change notice is the new list prefixed with a header, or an
/// explicit "no tasks" marker when the list is empty. An optional
/// Handlebars template overrides the default; template syntax is validated
/// at config load, so a render failure here falls back to the default
/// with a warning rather than failing the delivery round.
///
/// # Template Context
///
/// - `tasks`: array of task line strings
/// - `count`: number of tasks
/// - `empty`: whether the list is empty
#[derive(Debug, Clone, Default)]
pub struct MessageComposer {
    template: Option<String>,
}

/// Template data for rendering the change notice.
#[derive(Serialize)]
struct TemplateData<'a> {
    tasks: Vec<&'a str>,
    count: usize,
    empty: bool,
}

impl MessageComposer {
    /// Creates a composer using the built-in notice texts.
    #[must_use]
    pub const fn new() -> Self {
        Self { template: None }
    }

    /// Sets a Handlebars template for the change notice.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Composes the notice sent when the task list has changed.
    #[must_use]
    pub fn change_notice(&self, tasks: &TaskList) -> String {
        if let Some(template) = &self.template {
            match self.render(template, tasks) {
                Ok(rendered) => return rendered,
                Err(e) => {
                    tracing::warn!("Notice template failed to render, using default: {e}");
                }
            }
        }

        if tasks.is_empty() {
            format!("Task list changed:\n{NO_TASKS}")
        } else {
            format!("Task list changed:\n{tasks}")
        }
    }

    /// Composes the notice sent when a cycle's fetch failed.
    #[must_use]
    pub fn failure_notice(&self, error: &impl fmt::Display) -> String {
        format!("Task list check failed: {error}")
    }

    fn render(&self, template: &str, tasks: &TaskList) -> Result<String, handlebars::RenderError> {
        let data = TemplateData {
            tasks: tasks.iter().collect(),
            count: tasks.len(),
            empty: tasks.is_empty(),
        };

        Handlebars::new().render_template(template, &data)
    }
}
