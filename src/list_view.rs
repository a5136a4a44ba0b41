use std::rc::Rc;

use crate::navigation::AppContext;
use crate::word_set::ActiveWordSet;
use crate::words::WordPair;

/// Read-only listing of the active lesson.
pub struct ListView {
    set: Rc<ActiveWordSet>,
}

impl ListView {
    pub fn open(set: Rc<ActiveWordSet>, ctx: &mut AppContext) -> Self {
        ctx.analytics.list_view_start(set.lesson_id());
        Self { set }
    }

    pub fn close(self, ctx: &mut AppContext) -> Rc<ActiveWordSet> {
        ctx.analytics.list_view_end();
        self.set
    }

    pub fn word_set(&self) -> &Rc<ActiveWordSet> {
        &self.set
    }

    pub fn rows(&self) -> &[WordPair] {
        self.set.pairs()
    }

    pub fn meta(&self) -> String {
        format!("{} — {} words", self.set.title(), self.set.len())
    }
}
