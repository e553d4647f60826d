pub type TargetId = u64;

/// One user-supplied hostname or URL, numbered in input order starting at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: TargetId,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedTargets {
    pub targets: Vec<Target>,
    pub empty_count: usize,
}

impl NormalizedTargets {
    pub fn valid_count(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Split a pasted or imported block into targets.
///
/// Lines are trimmed; blank lines inside the block are skipped and counted in
/// `empty_count`. Blank lines at the very start or end of the block are not
/// counted, so a trailing newline does not register as an empty target.
pub fn normalize_targets(raw: &str) -> NormalizedTargets {
    let block = raw.trim();
    if block.is_empty() {
        return NormalizedTargets::default();
    }

    let mut normalized = NormalizedTargets::default();
    for line in block.lines().map(str::trim) {
        if line.is_empty() {
            normalized.empty_count += 1;
            continue;
        }
        let id = normalized.targets.len() as TargetId + 1;
        normalized.targets.push(Target {
            id,
            raw: line.to_owned(),
        });
    }
    normalized
}
