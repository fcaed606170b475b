/// Correctness of a single character position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CharState {
    #[default]
    Untyped,
    Correct,
    Incorrect,
}

/// Position of the next expected input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cursor {
    pub word_index: usize,
    pub char_index: usize,
}

impl Cursor {
    pub fn new(word_index: usize, char_index: usize) -> Self {
        Self {
            word_index,
            char_index,
        }
    }
}

/// Where the cursor sits relative to the word list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorPhase {
    BeforeStart,
    InWord,
    AtWordEnd,
    AfterLast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacterResult {
    pub matched: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordBoundaryResult {
    pub skipped_count: usize,
    pub completed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackspaceResult {
    /// Cursor at the absolute start, or the run is over.
    NoOp,
    /// Stepped back into a previous word that holds no typed characters.
    Moved,
    /// A typed or skipped character was cleared back to untyped.
    /// `counted` is false for characters marked by a word boundary, which
    /// never contributed a keystroke.
    Cleared { was_correct: bool, counted: bool },
}

#[derive(Clone, Debug)]
struct Slot {
    expected: char,
    state: CharState,
    skipped: bool,
}

#[derive(Clone, Debug)]
struct WordSlots {
    text: String,
    slots: Vec<Slot>,
}

impl WordSlots {
    fn new(text: String) -> Self {
        let slots = text
            .chars()
            .map(|expected| Slot {
                expected,
                state: CharState::Untyped,
                skipped: false,
            })
            .collect();
        Self { text, slots }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

/// Read-only projection of one word for rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct WordView<'a> {
    pub index: usize,
    pub text: &'a str,
    pub chars: Vec<(char, CharState)>,
    pub is_current: bool,
    /// Index of the character the cursor points at, if inside this word.
    pub active_char: Option<usize>,
    /// Cursor sits after the last character of this word.
    pub end_active: bool,
}

/// Tracks per-character correctness of typed input against a word list.
#[derive(Clone, Debug, Default)]
pub struct TextMatchEngine {
    words: Vec<WordSlots>,
    cursor: Cursor,
}

impl TextMatchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut engine = Self::new();
        engine.load_words(words);
        engine
    }

    /// Replace the word list and reset every character and the cursor.
    pub fn load_words<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words = words
            .into_iter()
            .map(|w| WordSlots::new(w.into()))
            .collect();
        self.cursor = Cursor::default();
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.text.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.word_index >= self.words.len()
    }

    pub fn phase(&self) -> CursorPhase {
        let Cursor {
            word_index,
            char_index,
        } = self.cursor;
        match self.words.get(word_index) {
            None => CursorPhase::AfterLast,
            Some(_) if word_index == 0 && char_index == 0 => CursorPhase::BeforeStart,
            Some(word) if char_index >= word.len() => CursorPhase::AtWordEnd,
            Some(_) => CursorPhase::InWord,
        }
    }

    pub fn char_state(&self, word_index: usize, char_index: usize) -> Option<CharState> {
        self.words
            .get(word_index)
            .and_then(|w| w.slots.get(char_index))
            .map(|s| s.state)
    }

    pub fn word_states(&self, word_index: usize) -> Option<Vec<CharState>> {
        self.words
            .get(word_index)
            .map(|w| w.slots.iter().map(|s| s.state).collect())
    }

    /// Compare `ch` against the expected character under the cursor.
    ///
    /// Returns `None` without touching any state when the cursor is already
    /// past the end of the current word (extra characters are ignored), when
    /// the run is complete, or when `ch` is a space.
    pub fn submit_character(&mut self, ch: char) -> Option<CharacterResult> {
        if ch == ' ' {
            return None;
        }
        let Cursor {
            word_index,
            char_index,
        } = self.cursor;
        let slot = self.words.get_mut(word_index)?.slots.get_mut(char_index)?;

        let matched = slot.expected == ch;
        slot.state = if matched {
            CharState::Correct
        } else {
            CharState::Incorrect
        };
        slot.skipped = false;
        self.cursor.char_index += 1;

        Some(CharacterResult { matched })
    }

    /// Give up on the rest of the current word and move to the next one.
    pub fn submit_word_boundary(&mut self) -> Option<WordBoundaryResult> {
        let Cursor {
            word_index,
            char_index,
        } = self.cursor;
        let word = self.words.get_mut(word_index)?;

        let mut skipped_count = 0;
        for slot in word.slots.iter_mut().skip(char_index) {
            if slot.state == CharState::Untyped {
                slot.state = CharState::Incorrect;
                slot.skipped = true;
                skipped_count += 1;
            }
        }

        self.cursor = Cursor::new(word_index + 1, 0);

        Some(WordBoundaryResult {
            skipped_count,
            completed: self.is_complete(),
        })
    }

    pub fn submit_backspace(&mut self) -> BackspaceResult {
        if self.is_complete() {
            return BackspaceResult::NoOp;
        }

        let Cursor {
            word_index,
            char_index,
        } = self.cursor;

        if char_index > 0 {
            self.cursor.char_index -= 1;
            return self.clear_at(word_index, char_index - 1);
        }

        if word_index == 0 {
            return BackspaceResult::NoOp;
        }

        // A boundary can leave a run of skipped characters behind the word's
        // typed prefix, so search from the end rather than stepping back once.
        let prev = word_index - 1;
        let last_marked = self.words[prev]
            .slots
            .iter()
            .rposition(|s| s.state != CharState::Untyped);

        match last_marked {
            None => {
                self.cursor = Cursor::new(prev, 0);
                BackspaceResult::Moved
            }
            Some(idx) => {
                self.cursor = Cursor::new(prev, idx);
                self.clear_at(prev, idx)
            }
        }
    }

    fn clear_at(&mut self, word_index: usize, char_index: usize) -> BackspaceResult {
        let slot = &mut self.words[word_index].slots[char_index];
        let cleared = match slot.state {
            CharState::Untyped => BackspaceResult::Moved,
            state => BackspaceResult::Cleared {
                was_correct: state == CharState::Correct,
                counted: !slot.skipped,
            },
        };
        slot.state = CharState::Untyped;
        slot.skipped = false;
        cleared
    }

    pub fn word_views(&self) -> impl Iterator<Item = WordView<'_>> {
        let cursor = self.cursor;
        self.words.iter().enumerate().map(move |(index, word)| {
            let is_current = index == cursor.word_index;
            WordView {
                index,
                text: &word.text,
                chars: word.slots.iter().map(|s| (s.expected, s.state)).collect(),
                is_current,
                active_char: (is_current && cursor.char_index < word.len())
                    .then_some(cursor.char_index),
                end_active: is_current && cursor.char_index >= word.len(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn engine(words: &[&str]) -> TextMatchEngine {
        TextMatchEngine::with_words(words.iter().copied())
    }

    #[test]
    fn test_load_words_resets_state() {
        let mut e = engine(&["time", "year"]);
        e.submit_character('t');
        e.submit_word_boundary();

        e.load_words(["abc"]);

        assert_eq!(e.cursor(), Cursor::new(0, 0));
        assert_eq!(e.word_count(), 1);
        assert_eq!(e.word_states(0), Some(vec![CharState::Untyped; 3]));
    }

    #[test]
    fn test_no_input_before_words_loaded() {
        let mut e = TextMatchEngine::new();

        assert!(e.is_complete());
        assert_eq!(e.submit_character('a'), None);
        assert_eq!(e.submit_word_boundary(), None);
        assert_eq!(e.submit_backspace(), BackspaceResult::NoOp);
    }

    #[test]
    fn test_submit_character_correct_and_incorrect() {
        let mut e = engine(&["time"]);

        assert_eq!(e.submit_character('t'), Some(CharacterResult { matched: true }));
        assert_eq!(e.submit_character('x'), Some(CharacterResult { matched: false }));

        assert_eq!(e.cursor(), Cursor::new(0, 2));
        assert_eq!(e.char_state(0, 0), Some(CharState::Correct));
        assert_eq!(e.char_state(0, 1), Some(CharState::Incorrect));
        assert_eq!(e.char_state(0, 2), Some(CharState::Untyped));
    }

    #[test]
    fn test_submit_character_is_case_sensitive() {
        let mut e = engine(&["First,"]);
        assert_eq!(e.submit_character('f'), Some(CharacterResult { matched: false }));
    }

    #[test]
    fn test_extra_characters_are_ignored() {
        let mut e = engine(&["hi", "there"]);
        e.submit_character('h');
        e.submit_character('i');

        assert_eq!(e.submit_character('x'), None);
        assert_eq!(e.cursor(), Cursor::new(0, 2));
        assert_eq!(e.phase(), CursorPhase::AtWordEnd);
    }

    #[test]
    fn test_space_is_not_a_character() {
        let mut e = engine(&["hi"]);
        assert_eq!(e.submit_character(' '), None);
        assert_eq!(e.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn test_word_boundary_at_start_skips_whole_word() {
        let mut e = engine(&["hello", "world"]);

        let result = e.submit_word_boundary();

        assert_eq!(
            result,
            Some(WordBoundaryResult {
                skipped_count: 5,
                completed: false
            })
        );
        assert_eq!(e.word_states(0), Some(vec![CharState::Incorrect; 5]));
        assert_eq!(e.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn test_word_boundary_after_full_word_skips_nothing() {
        let mut e = engine(&["ab", "cd"]);
        e.submit_character('a');
        e.submit_character('b');

        let result = e.submit_word_boundary().unwrap();

        assert_eq!(result.skipped_count, 0);
        assert!(!result.completed);
        assert_eq!(e.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn test_word_boundary_on_last_word_completes() {
        let mut e = engine(&["a"]);
        let result = e.submit_word_boundary().unwrap();

        assert!(result.completed);
        assert!(e.is_complete());
        assert_eq!(e.phase(), CursorPhase::AfterLast);
        assert_eq!(e.submit_word_boundary(), None);
        assert_eq!(e.submit_character('a'), None);
        assert_eq!(e.submit_backspace(), BackspaceResult::NoOp);
    }

    #[test]
    fn test_backspace_at_origin_is_noop() {
        let mut e = engine(&["time"]);
        assert_eq!(e.phase(), CursorPhase::BeforeStart);

        assert_eq!(e.submit_backspace(), BackspaceResult::NoOp);
        assert_eq!(e.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn test_backspace_within_word_reports_cleared_state() {
        let mut e = engine(&["time"]);
        e.submit_character('t');
        e.submit_character('x');

        assert_matches!(
            e.submit_backspace(),
            BackspaceResult::Cleared {
                was_correct: false,
                counted: true
            }
        );
        assert_matches!(
            e.submit_backspace(),
            BackspaceResult::Cleared {
                was_correct: true,
                counted: true
            }
        );
        assert_eq!(e.cursor(), Cursor::new(0, 0));
        assert_eq!(e.word_states(0), Some(vec![CharState::Untyped; 4]));
    }

    #[test]
    fn test_backspace_into_previous_word_finds_last_marked() {
        let mut e = engine(&["hello", "x"]);
        e.submit_character('h');
        e.submit_character('e');
        e.submit_word_boundary();

        // The trailing "llo" were marked by the boundary, not typed.
        assert_matches!(
            e.submit_backspace(),
            BackspaceResult::Cleared {
                was_correct: false,
                counted: false
            }
        );
        assert_eq!(e.cursor(), Cursor::new(0, 4));
        assert_eq!(e.char_state(0, 3), Some(CharState::Incorrect));
        assert_eq!(e.char_state(0, 4), Some(CharState::Untyped));
    }

    #[test]
    fn test_backspace_into_typed_previous_word() {
        let mut e = engine(&["ab", "cd"]);
        e.submit_character('a');
        e.submit_character('b');
        e.submit_word_boundary();

        assert_matches!(
            e.submit_backspace(),
            BackspaceResult::Cleared {
                was_correct: true,
                counted: true
            }
        );
        assert_eq!(e.cursor(), Cursor::new(0, 1));
    }

    #[test]
    fn test_backspace_into_empty_previous_word() {
        let mut e = engine(&["", "cd"]);
        e.submit_word_boundary();

        assert_eq!(e.submit_backspace(), BackspaceResult::Moved);
        assert_eq!(e.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn test_retyping_a_skipped_character_counts_it() {
        let mut e = engine(&["ab", "c"]);
        e.submit_word_boundary();
        e.submit_backspace();
        assert_eq!(e.cursor(), Cursor::new(0, 1));

        assert_eq!(e.submit_character('b'), Some(CharacterResult { matched: true }));
        assert_matches!(
            e.submit_backspace(),
            BackspaceResult::Cleared {
                was_correct: true,
                counted: true
            }
        );
    }

    #[test]
    fn test_word_views_mark_cursor() {
        let mut e = engine(&["ab", "cd"]);
        e.submit_character('a');

        let views: Vec<_> = e.word_views().collect();
        assert_eq!(views.len(), 2);
        assert!(views[0].is_current);
        assert_eq!(views[0].active_char, Some(1));
        assert!(!views[0].end_active);
        assert_eq!(views[0].chars[0], ('a', CharState::Correct));
        assert!(!views[1].is_current);

        e.submit_character('b');
        let first = e.word_views().next().unwrap();
        assert_eq!(first.active_char, None);
        assert!(first.end_active);
    }
}
