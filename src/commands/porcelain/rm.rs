use crate::areas::repository::Repository;

impl Repository {
    pub fn rm(&mut self, file: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        let head = self.head_commit()?;
        let removal = self.index_mut().stage_remove(file, &head)?;

        if removal.staged {
            self.workspace().remove_file(file)?;
        }

        self.persist()
    }
}
