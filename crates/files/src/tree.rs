use serde::Serialize;

/// A node of the read-only project tree shown next to the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub key: String,
    pub title: String,
    pub is_leaf: bool,
    pub children: Vec<ProjectFile>,
}

impl ProjectFile {
    pub fn file(name: &str) -> Self {
        Self {
            key: name.to_string(),
            title: name.to_string(),
            is_leaf: true,
            children: Vec::new(),
        }
    }

    pub fn directory(name: &str, children: Vec<ProjectFile>) -> Self {
        Self {
            key: name.to_string(),
            title: name.to_string(),
            is_leaf: false,
            children,
        }
    }

    /// Depth first search for a node by key
    pub fn find(&self, key: &str) -> Option<&ProjectFile> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }

    /// Keys of every leaf, depth first
    pub fn leaves(&self) -> Vec<&str> {
        if self.is_leaf {
            return vec![self.key.as_str()];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }
}

/// The sample project every editor session starts with
pub fn default_project() -> ProjectFile {
    ProjectFile::directory(
        "project",
        vec![
            ProjectFile::directory(
                "src",
                vec![
                    ProjectFile::file("main.js"),
                    ProjectFile::file("app.ts"),
                    ProjectFile::file("utils.py"),
                    ProjectFile::file("main.cpp"),
                    ProjectFile::file("main.c"),
                    ProjectFile::file("Main.java"),
                    ProjectFile::file("index.php"),
                ],
            ),
            ProjectFile::directory(
                "public",
                vec![
                    ProjectFile::file("index.html"),
                    ProjectFile::file("styles.css"),
                ],
            ),
            ProjectFile::file("README.md"),
        ],
    )
}
