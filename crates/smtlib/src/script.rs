use crate::command::Command;

/// An SMT-LIB script: a sequence of commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Script {
    commands: Vec<Command>,
}

impl Script {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn with_commands(commands: Vec<Command>) -> Self {
        Self { commands }
    }

    pub fn push(&mut self, cmd: Command) {
        self.commands.push(cmd);
    }

    pub fn extend(&mut self, cmds: impl IntoIterator<Item = Command>) {
        self.commands.extend(cmds);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort::Sort;
    use crate::term::Term;

    #[test]
    fn new_creates_empty_script() {
        let script = Script::new();
        assert!(script.is_empty());
        assert_eq!(script.len(), 0);
        assert!(script.commands().is_empty());
        assert_eq!(script, Script::default());
    }

    #[test]
    fn push_preserves_order() {
        let mut script = Script::new();
        script.push(Command::SetLogic("QF_BV".to_string()));
        script.push(Command::DeclareFun("s0".to_string(), vec![], Sort::BitVec(8)));
        script.push(Command::Assert(Term::constant("s1")));
        script.push(Command::CheckSat);

        let cmds = script.commands();
        assert_eq!(cmds.len(), 4);
        assert!(matches!(&cmds[0], Command::SetLogic(l) if l == "QF_BV"));
        assert!(matches!(&cmds[1], Command::DeclareFun(n, params, Sort::BitVec(8)) if n == "s0" && params.is_empty()));
        assert!(matches!(&cmds[2], Command::Assert(_)));
        assert_eq!(cmds[3], Command::CheckSat);
    }

    #[test]
    fn extend_after_push() {
        let mut script = Script::with_commands(vec![Command::CheckSat]);
        script.extend(vec![Command::GetObjectives, Command::Comment("done".into())]);
        assert_eq!(script.len(), 3);
        assert!(!script.is_empty());
        assert_eq!(script.commands()[1], Command::GetObjectives);
    }
}
