use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const SCHOOL_FILE: &str = "school.json";

#[derive(Debug, thiserror::Error)]
pub enum SchoolError {
    #[error("failed to read reference data {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("reference data {} is malformed: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub subject_id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub class_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<i64>,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The on-disk reference document, served as-is by `/api/bootstrap`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchoolDocument {
    pub teacher: Teacher,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub students: Vec<Student>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DanglingRef {
    ClassSubject { class_id: String, subject_id: String },
    StudentClass { student_id: String, class_id: String },
}

/// Read-only view over the reference document, built once at startup.
#[derive(Debug)]
pub struct SchoolData {
    doc: SchoolDocument,
    subject_idx: HashMap<String, usize>,
    class_idx: HashMap<String, usize>,
    student_idx: HashMap<String, usize>,
}

impl SchoolData {
    pub fn new(doc: SchoolDocument) -> Self {
        fn index<T>(items: &[T], id: impl Fn(&T) -> &str) -> HashMap<String, usize> {
            let mut out = HashMap::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                // First occurrence wins on duplicate ids.
                out.entry(id(item).to_string()).or_insert(i);
            }
            out
        }
        let subject_idx = index(&doc.subjects, |s| s.id.as_str());
        let class_idx = index(&doc.classes, |c| c.id.as_str());
        let student_idx = index(&doc.students, |s| s.id.as_str());
        Self {
            doc,
            subject_idx,
            class_idx,
            student_idx,
        }
    }

    pub fn load(data_dir: &Path) -> Result<Self, SchoolError> {
        let path = data_dir.join(SCHOOL_FILE);
        let raw = std::fs::read_to_string(&path).map_err(|source| SchoolError::Read {
            path: path.clone(),
            source,
        })?;
        let doc: SchoolDocument =
            serde_json::from_str(&raw).map_err(|source| SchoolError::Parse { path, source })?;
        Ok(Self::new(doc))
    }

    pub fn document(&self) -> &SchoolDocument {
        &self.doc
    }

    pub fn teacher(&self) -> &Teacher {
        &self.doc.teacher
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subject_idx.get(id).map(|&i| &self.doc.subjects[i])
    }

    pub fn class(&self, id: &str) -> Option<&Class> {
        self.class_idx.get(id).map(|&i| &self.doc.classes[i])
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.student_idx.get(id).map(|&i| &self.doc.students[i])
    }

    pub fn classes_for_subject(&self, subject_id: &str) -> Vec<&Class> {
        self.doc
            .classes
            .iter()
            .filter(|c| c.subject_id == subject_id)
            .collect()
    }

    /// Roster order: by number, unnumbered students last, then by name.
    pub fn students_for_class(&self, class_id: &str) -> Vec<&Student> {
        let mut out: Vec<&Student> = self
            .doc
            .students
            .iter()
            .filter(|s| s.class_id == class_id)
            .collect();
        out.sort_by(|a, b| {
            let ka = (a.number.is_none(), a.number.unwrap_or(0));
            let kb = (b.number.is_none(), b.number.unwrap_or(0));
            ka.cmp(&kb).then_with(|| a.name.cmp(&b.name))
        });
        out
    }

    /// Foreign keys the UI cascade would silently hide. Never enforced.
    pub fn dangling_references(&self) -> Vec<DanglingRef> {
        let mut out = Vec::new();
        for c in &self.doc.classes {
            if self.subject(&c.subject_id).is_none() {
                out.push(DanglingRef::ClassSubject {
                    class_id: c.id.clone(),
                    subject_id: c.subject_id.clone(),
                });
            }
        }
        for s in &self.doc.students {
            if self.class(&s.class_id).is_none() {
                out.push(DanglingRef::StudentClass {
                    student_id: s.id.clone(),
                    class_id: s.class_id.clone(),
                });
            }
        }
        out
    }
}
