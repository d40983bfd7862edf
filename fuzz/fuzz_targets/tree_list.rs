#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use tree_list::TreeList;

#[derive(Arbitrary, Debug)]
enum Action<A> {
    Insert(usize, A),
    Remove(usize),
    Set(usize, A),
    Get(usize),
    PushBack(A),
    PopFront,
    SplitTraverse,
    CursorEdit(usize, A),
    Concat(Vec<A>),
}

fuzz_target!(|actions: Vec<Action<u32>>| {
    let mut list = TreeList::new();
    let mut nat: Vec<u32> = Vec::new();
    for action in actions {
        match action {
            Action::Insert(at, value) => {
                let at = at % (nat.len() + 1);
                list.insert(at, value);
                nat.insert(at, value);
            }
            Action::Remove(at) => {
                if !nat.is_empty() {
                    let at = at % nat.len();
                    assert_eq!(nat.remove(at), list.remove(at));
                }
            }
            Action::Set(at, value) => {
                if !nat.is_empty() {
                    let at = at % nat.len();
                    assert_eq!(std::mem::replace(&mut nat[at], value), list.set(at, value));
                }
            }
            Action::Get(at) => {
                assert_eq!(nat.get(at), list.get(at));
                assert_eq!(nat.first(), list.front());
                assert_eq!(nat.last(), list.back());
            }
            Action::PushBack(value) => {
                list.push_back(value);
                nat.push(value);
            }
            Action::PopFront => {
                assert_eq!(
                    if nat.is_empty() { None } else { Some(nat.remove(0)) },
                    list.pop_front()
                );
            }
            Action::SplitTraverse => {
                let mut back = list.splitter();
                let values: Vec<u32> = match back.split() {
                    Some(front) => {
                        assert_eq!(nat.len(), front.len() + back.len());
                        front.cloned().chain(back.cloned()).collect()
                    }
                    None => back.cloned().collect(),
                };
                assert_eq!(nat, values);
            }
            Action::CursorEdit(at, value) => {
                let at = at % (nat.len() + 1);
                let mut cursor = list.cursor(at);
                if cursor.has_next() {
                    assert_eq!(Some(&nat[at]), cursor.next());
                    assert_eq!(Some(nat.remove(at)), cursor.remove());
                }
                cursor.insert(value);
                nat.insert(at, value);
            }
            Action::Concat(tail) => {
                if nat.len() + tail.len() <= 1 << 16 {
                    nat.extend(tail.iter().cloned());
                    let other = TreeList::from(tail);
                    list.append(other);
                }
            }
        }
        list.assert_invariants();
        assert_eq!(nat.len(), list.len());
    }
    assert_eq!(TreeList::from(nat.clone()), list);
    for (a, b) in list.iter().zip(&nat) {
        assert_eq!(a, b);
    }
    for (a, b) in list.iter().rev().zip(nat.iter().rev()) {
        assert_eq!(a, b);
    }
    for (a, b) in list.into_iter().zip(nat) {
        assert_eq!(a, b);
    }
});
