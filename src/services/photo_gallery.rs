//! 相册浏览：筛选、可选项和统计文字

use std::collections::BTreeSet;

use crate::models::{Photo, PhotoType};

/// 筛选条件，两个条件都为空时显示全部
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoFilter {
    /// 命中任一分类即可
    pub types: Vec<PhotoType>,
    pub years: Vec<i32>,
}

impl PhotoFilter {
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.years.is_empty()
    }

    pub fn matches(&self, photo: &Photo) -> bool {
        let type_ok =
            self.types.is_empty() || photo.types.iter().any(|t| self.types.contains(t));
        let year_ok = self.years.is_empty() || self.years.contains(&photo.year);
        type_ok && year_ok
    }

    /// 按原顺序返回符合条件的照片
    pub fn apply<'a>(&self, photos: &'a [Photo]) -> Vec<&'a Photo> {
        photos.iter().filter(|p| self.matches(p)).collect()
    }
}

/// 相册中出现过的分类
pub fn distinct_types(photos: &[Photo]) -> Vec<PhotoType> {
    photos
        .iter()
        .flat_map(|p| p.types.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 相册中出现过的年份，从新到旧
pub fn distinct_years_desc(photos: &[Photo]) -> Vec<i32> {
    photos
        .iter()
        .map(|p| p.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// 底部统计文字
pub fn summary_line(total: usize, shown: usize) -> String {
    format!(
        "총 {} 장의 사진이 있습니다. 현재 {} 장이 표시되고 있습니다.",
        total, shown
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: u64, types: Vec<PhotoType>, year: i32) -> Photo {
        Photo {
            id,
            name: format!("사진 {}", id),
            types,
            year,
            url: "http://x".to_string(),
        }
    }

    fn sample() -> Vec<Photo> {
        vec![
            photo(1, vec![PhotoType::Landscape, PhotoType::Travel], 2023),
            photo(2, vec![PhotoType::Landscape], 2022),
            photo(3, vec![PhotoType::Street, PhotoType::Travel], 2024),
            photo(4, vec![PhotoType::Macro], 2023),
        ]
    }

    #[test]
    fn test_empty_filter_shows_all() {
        let photos = sample();
        assert_eq!(PhotoFilter::default().apply(&photos).len(), 4);
    }

    #[test]
    fn test_type_and_year_filters_combine() {
        let photos = sample();
        let filter = PhotoFilter {
            types: vec![PhotoType::Travel],
            years: vec![2023, 2022],
        };
        let ids: Vec<u64> = filter.apply(&photos).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1]);

        let any_type = PhotoFilter {
            types: vec![PhotoType::Macro, PhotoType::Street],
            years: vec![],
        };
        let ids: Vec<u64> = any_type.apply(&photos).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 4]);
    }

    #[test]
    fn test_distinct_values() {
        let photos = sample();
        assert_eq!(distinct_years_desc(&photos), vec![2024, 2023, 2022]);
        assert_eq!(
            distinct_types(&photos),
            vec![
                PhotoType::Landscape,
                PhotoType::Travel,
                PhotoType::Macro,
                PhotoType::Street
            ]
        );
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary_line(4, 2),
            "총 4 장의 사진이 있습니다. 현재 2 장이 표시되고 있습니다."
        );
    }
}
