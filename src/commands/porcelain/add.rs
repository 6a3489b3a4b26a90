use crate::areas::repository::Repository;

impl Repository {
    pub fn add(&mut self, file: &str) -> anyhow::Result<()> {
        self.rehydrate()?;

        let content = self.workspace().read_file(file)?;
        let head = self.head_commit()?;
        self.index_mut().stage_add(file, content, &head)?;

        self.persist()
    }
}
