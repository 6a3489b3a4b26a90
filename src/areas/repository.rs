use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::GitletError;
use std::cell::{RefCell, RefMut};
use std::path::Path;

/// Name of the metadata directory inside the working directory
pub const GITLET_DIR: &str = ".gitlet";

/// The repository state threaded through every command
///
/// Opening a repository only wires the areas together. Commands other than
/// `init` call [`Repository::rehydrate`] to load the staging area and branch
/// registry, and [`Repository::persist`] once all their objects are stored.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    index: Index,
    refs: Refs,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let gitlet_path = path.join(GITLET_DIR);

        let database = Database::new(gitlet_path.join("objects").into_boxed_path());
        let index = Index::new(gitlet_path.join("staging").into_boxed_path());
        let refs = Refs::new(gitlet_path.clone().into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
            index,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gitlet_path(&self) -> Box<Path> {
        self.path.join(GITLET_DIR).into_boxed_path()
    }

    pub fn is_initialized(&self) -> bool {
        self.gitlet_path().is_dir()
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.index
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn refs_mut(&mut self) -> &mut Refs {
        &mut self.refs
    }

    /// Load the staging area and the branch registry
    ///
    /// Fails with `NotInitialized` outside an initialized directory.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(GitletError::NotInitialized.into());
        }

        self.index.rehydrate()?;
        self.refs.rehydrate()?;

        Ok(())
    }

    /// Write back the staging area and the branch registry if they changed
    pub fn persist(&mut self) -> anyhow::Result<()> {
        self.index.write_updates()?;
        self.refs.write_updates()?;

        Ok(())
    }

    pub fn head_oid(&self) -> anyhow::Result<ObjectId> {
        self.refs.head_oid().cloned()
    }

    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        self.database.load_commit(self.refs.head_oid()?)
    }

    /// Ancestry queries backed by the object store
    pub fn split_point_finder(
        &self,
    ) -> SplitPointFinder<impl Fn(&ObjectId) -> anyhow::Result<Vec<ObjectId>> + '_> {
        SplitPointFinder::new(|oid| Ok(self.database.load_commit(oid)?.parents().to_vec()))
    }
}
