use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck_shared::{Task, TaskPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Continue,
    Submit,
    Cancel,
}

/// Title/description input shared by the add form and the edit modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub focus: Field,
    original: Option<Task>,
}

impl TaskForm {
    pub fn empty() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            focus: Field::Title,
            original: None,
        }
    }

    pub fn editing(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            focus: Field::Title,
            original: Some(task.clone()),
        }
    }

    pub fn task_id(&self) -> Option<u64> {
        self.original.as_ref().map(|task| task.id)
    }

    /// Only the fields that differ from the task being edited.
    pub fn patch(&self) -> TaskPatch {
        let changed = |value: &str, current: Option<&str>| {
            (current != Some(value)).then(|| value.to_string())
        };
        let original = self.original.as_ref();
        TaskPatch {
            title: changed(&self.title, original.map(|t| t.title.as_str())),
            description: changed(
                &self.description,
                original.map(|t| t.description.as_str()),
            ),
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        match key.code {
            KeyCode::Esc => FormAction::Cancel,
            KeyCode::Enter => FormAction::Submit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    Field::Title => Field::Description,
                    Field::Description => Field::Title,
                };
                FormAction::Continue
            }
            KeyCode::Backspace => {
                self.focused_mut().pop();
                FormAction::Continue
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focused_mut().clear();
                FormAction::Continue
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.focused_mut().push(c);
                FormAction::Continue
            }
            _ => FormAction::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(form: &mut TaskForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_fills_focused_field() {
        let mut form = TaskForm::empty();
        type_text(&mut form, "Buy milk");
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "2l");
        form.handle_key(key(KeyCode::Backspace));

        assert_eq!(form.title, "Buy milk");
        assert_eq!(form.description, "2");
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormAction::Cancel);
    }

    #[test]
    fn edit_patch_only_carries_changed_fields() {
        let task = Task {
            id: 3,
            title: "Old".to_string(),
            description: "same".to_string(),
            completed: false,
            created_at: String::new(),
            updated_at: String::new(),
        };
        let mut form = TaskForm::editing(&task);
        assert_eq!(form.task_id(), Some(3));
        assert_eq!(form.patch(), TaskPatch::default());

        form.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        type_text(&mut form, "New");
        assert_eq!(form.patch(), TaskPatch::title("New"));
    }
}
