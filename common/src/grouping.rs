//! 出現順を保つグルーピング

use std::collections::HashMap;
use std::hash::Hash;

/// キーごとに要素をまとめる（最初に出現した順を保持）
///
/// `key` が `None` を返した要素は捨てる。グループ内の要素順も入力順のまま。
pub fn group_stable<T, K, I, F>(items: I, mut key: F) -> Vec<(K, Vec<T>)>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> Option<K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<T>)> = Vec::new();

    for item in items {
        let Some(k) = key(&item) else {
            continue;
        };
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order() {
        let rows = vec![("B", 1), ("A", 2), ("B", 3), ("C", 4), ("A", 5)];
        let groups = group_stable(rows, |r| Some(r.0));

        let keys: Vec<&str> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["B", "A", "C"]);
        assert_eq!(groups[0].1, vec![("B", 1), ("B", 3)]);
        assert_eq!(groups[1].1, vec![("A", 2), ("A", 5)]);
    }

    #[test]
    fn test_none_keys_dropped() {
        let rows = vec![Some("x"), None, Some("x"), None];
        let groups = group_stable(rows, |r| r.map(str::to_string));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_stable(Vec::<u32>::new(), |v| Some(*v));
        assert!(groups.is_empty());
    }
}
