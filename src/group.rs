/// A named grouping of a command's arguments, used for help structure
/// and, when exclusive, to constrain usage.
///
/// Groups do not own arguments; they reference arguments of the owning
/// command by canonical name. Groups nest, and an exclusive group's
/// constraint covers its whole transitive tree: at most one referenced
/// argument may be used.
pub struct ArgumentGroup {
    name: String,
    description: Option<String>,
    exclusive: bool,
    members: Vec<String>,
    sub_groups: Vec<ArgumentGroup>,
}

impl ArgumentGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            exclusive: false,
            members: Vec::default(),
            sub_groups: Vec::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// At most one argument in this group's transitive tree may be used.
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    /// Reference an argument of the owning command by canonical name.
    pub fn member(mut self, name: impl Into<String>) -> Self {
        self.members.push(name.into());
        self
    }

    /// Nest another group.
    pub fn group(mut self, sub_group: ArgumentGroup) -> Self {
        self.sub_groups.push(sub_group);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn sub_groups(&self) -> &[ArgumentGroup] {
        &self.sub_groups
    }

    /// All member names of this group and its sub-groups.
    pub(crate) fn transitive_members(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.members.iter().map(String::as_str).collect();

        for sub_group in &self.sub_groups {
            names.extend(sub_group.transitive_members());
        }

        names
    }
}
