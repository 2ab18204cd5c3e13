use std::collections::HashMap;

use crate::error::NotificationError;
use crate::types::Notification;

/// Rendered notification content
#[derive(Debug, Clone)]
pub struct RenderedContent {
    pub subject: Option<String>,
    pub body: String,
    pub html_body: Option<String>,
}

/// Simple template renderer using {{variable}} syntax
pub struct TemplateRenderer {
    templates: HashMap<String, Template>,
}

#[derive(Debug, Clone)]
pub struct Template {
    pub id: String,
    pub subject: Option<String>,
    pub body: String,
    pub html_body: Option<String>,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn register(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn get(&self, template_id: &str) -> Option<&Template> {
        self.templates.get(template_id)
    }

    pub fn render(
        &self,
        template_id: &str,
        data: &HashMap<String, serde_json::Value>,
    ) -> Result<RenderedContent, NotificationError> {
        let template = self
            .templates
            .get(template_id)
            .ok_or(NotificationError::TemplateNotFound(template_id.to_string()))?;

        let subject = template
            .subject
            .as_ref()
            .map(|s| self.render_string(s, data));
        let body = self.render_string(&template.body, data);
        let html_body = template
            .html_body
            .as_ref()
            .map(|s| self.render_string(s, data));

        Ok(RenderedContent {
            subject,
            body,
            html_body,
        })
    }

    /// Render a notification's named template with its context.
    ///
    /// `title` and `content` are always available to the template alongside
    /// the notification's own context variables.
    pub fn render_notification(
        &self,
        template_id: &str,
        notification: &Notification,
    ) -> Result<RenderedContent, NotificationError> {
        let mut data = notification.context.clone();
        data.insert("title".to_string(), serde_json::json!(notification.title));
        data.insert(
            "content".to_string(),
            serde_json::json!(notification.content),
        );
        self.render(template_id, &data)
    }

    fn render_string(&self, template: &str, data: &HashMap<String, serde_json::Value>) -> String {
        let mut result = template.to_string();

        for (key, value) in data {
            let placeholder = format!("{{{{{}}}}}", key);
            let replacement = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => String::new(),
                _ => value.to_string(),
            };
            result = result.replace(&placeholder, &replacement);
        }

        result
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}
