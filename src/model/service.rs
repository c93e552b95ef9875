//! Model/command service: owns the project, the current selection and the
//! queue of notifications consumed by the editor.

use crate::error::Result;
use crate::model::{NodeId, ObjectNode, ObjectTree};
use crate::project::Project;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum DesignerEvent {
    ProjectLoaded,
    ProjectSaved,
    ObjectSelected(NodeId),
    ObjectCreated(NodeId),
    ObjectRemoved(NodeId),
    PropertyModified { node: NodeId, name: String },
    ProjectRefresh,
    CodeGeneration,
}

pub(crate) type SharedModel = Rc<RefCell<DesignerModel>>;

#[derive(Default)]
pub(crate) struct DesignerModel {
    project: Project,
    selected: Option<NodeId>,
    events: VecDeque<DesignerEvent>,
    path: Option<PathBuf>,
    modified: bool,
}

impl DesignerModel {
    pub(crate) fn new(project: Project) -> Self {
        let mut model = Self::default();
        model.set_project(project);
        model
    }

    pub(crate) fn shared(self) -> SharedModel {
        Rc::new(RefCell::new(self))
    }

    pub(crate) fn tree(&self) -> &ObjectTree {
        &self.project.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut ObjectTree {
        &mut self.project.tree
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn selected_object(&self) -> Option<NodeId> {
        self.selected.filter(|&id| self.tree().contains(id))
    }

    /// Form of the selected object. `None` when nothing (or the project root)
    /// is selected.
    pub(crate) fn selected_form(&self) -> Option<NodeId> {
        self.selected_object().and_then(|id| self.tree().form_of(id))
    }

    /// Returns false when `node` was already selected and `force` is unset.
    pub(crate) fn select_object(&mut self, node: NodeId, force: bool, notify: bool) -> bool {
        if !self.tree().contains(node) {
            log::warn!("Cannot select {node}: not in the project");
            return false;
        }
        if !force && self.selected == Some(node) {
            return false;
        }
        self.selected = Some(node);
        if notify {
            self.events.push_back(DesignerEvent::ObjectSelected(node));
        }
        true
    }

    /// Writes through the property layer; emits a modification event only
    /// when the value actually changed.
    pub(crate) fn modify_property(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        let Some(obj) = self.project.tree.get_mut(node) else {
            log::warn!("Cannot modify {name}: object {node} is gone");
            return false;
        };
        if !obj.update_property(name, value) {
            return false;
        }
        self.modified = true;
        self.events.push_back(DesignerEvent::PropertyModified {
            node,
            name: name.to_string(),
        });
        true
    }

    pub(crate) fn create_object(&mut self, parent: NodeId, node: ObjectNode) -> Option<NodeId> {
        if !self.tree().contains(parent) {
            return None;
        }
        let id = self.project.tree.insert(Some(parent), node);
        self.modified = true;
        self.selected = Some(id);
        self.events.push_back(DesignerEvent::ObjectCreated(id));
        Some(id)
    }

    pub(crate) fn remove_object(&mut self, node: NodeId) -> bool {
        let parent = self.tree().parent(node);
        if parent.is_none() || !self.project.tree.remove(node) {
            return false;
        }
        self.modified = true;
        if !self.selected.is_some_and(|s| self.tree().contains(s)) {
            self.selected = parent;
        }
        self.events.push_back(DesignerEvent::ObjectRemoved(node));
        true
    }

    /// Replaces the project and selects its first form.
    pub(crate) fn set_project(&mut self, project: Project) {
        self.project = project;
        self.selected = self.tree().forms().first().copied().or(self.tree().root());
        self.modified = false;
        self.events.push_back(DesignerEvent::ProjectLoaded);
    }

    pub(crate) fn load_project(&mut self, path: &Path) -> Result<()> {
        let project = Project::load(path)?;
        self.set_project(project);
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    pub(crate) fn save_project(&mut self, path: &Path) -> Result<()> {
        self.project.save(path)?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        self.events.push_back(DesignerEvent::ProjectSaved);
        Ok(())
    }

    pub(crate) fn refresh(&mut self) {
        self.events.push_back(DesignerEvent::ProjectRefresh);
    }

    pub(crate) fn generate_code(&mut self) {
        self.events.push_back(DesignerEvent::CodeGeneration);
    }

    pub(crate) fn poll_event(&mut self) -> Option<DesignerEvent> {
        self.events.pop_front()
    }

    #[cfg(test)]
    pub(crate) fn drain_events(&mut self) -> Vec<DesignerEvent> {
        self.events.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> (DesignerModel, NodeId, NodeId) {
        let mut project = Project::empty();
        let root = project.tree.root().unwrap();
        let form = project
            .tree
            .insert(Some(root), ObjectNode::new("Frame", "form").with("size", "10,10"));
        let button = project
            .tree
            .insert(Some(form), ObjectNode::new("wxButton", "widget"));
        let mut model = DesignerModel::new(project);
        model.drain_events();
        (model, form, button)
    }

    #[test]
    fn test_set_project_selects_first_form() {
        let (mut model, form, _) = model();
        assert_eq!(model.selected_object(), Some(form));
        assert_eq!(model.selected_form(), Some(form));
        model.set_project(Project::empty());
        assert_eq!(model.poll_event(), Some(DesignerEvent::ProjectLoaded));
        assert_eq!(model.selected_form(), None);
    }

    #[test]
    fn test_select_object_respects_force_and_notify() {
        let (mut model, form, button) = model();
        assert!(!model.select_object(form, false, true));
        assert!(model.select_object(form, true, true));
        assert!(model.select_object(button, false, false));
        assert_eq!(model.selected_form(), Some(form));
        assert_eq!(model.drain_events(), vec![DesignerEvent::ObjectSelected(form)]);
    }

    #[test]
    fn test_modify_property_emits_only_on_change() {
        let (mut model, form, _) = model();
        assert!(!model.modify_property(form, "size", "10,10"));
        assert!(model.modify_property(form, "size", "20,10"));
        assert!(!model.modify_property(form, "title", "absent"));
        assert_eq!(
            model.drain_events(),
            vec![DesignerEvent::PropertyModified {
                node: form,
                name: "size".into()
            }]
        );
        assert!(model.is_modified());
    }

    #[test]
    fn test_remove_object_moves_selection_to_parent() {
        let (mut model, form, button) = model();
        model.select_object(button, false, false);
        assert!(model.remove_object(button));
        assert_eq!(model.selected_object(), Some(form));
        assert_eq!(model.drain_events(), vec![DesignerEvent::ObjectRemoved(button)]);
        let root = model.tree().root().unwrap();
        assert!(!model.remove_object(root));
    }
}
