use crate::entities::{
    astrologer_entity as astrologers, consultation_entity as consultations,
    review_entity as reviews,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AstrologerAdminView, AstrologerDetail, AstrologerProfile, AstrologerPublic, CreateReviewRequest,
    ReviewResponse, UpdateAstrologerProfileRequest,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

/// 平均评分，保留两位小数
fn average_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    let avg = sum as f64 / ratings.len() as f64;
    Some((avg * 100.0).round() / 100.0)
}

#[derive(Clone)]
pub struct AstrologerService {
    pool: DatabaseConnection,
}

impl AstrologerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 公开目录：已审核且未封禁，按评分降序
    pub async fn list_public(&self) -> AppResult<Vec<AstrologerPublic>> {
        let list = astrologers::Entity::find()
            .filter(astrologers::Column::IsApproved.eq(true))
            .filter(astrologers::Column::IsBlocked.eq(false))
            .order_by_desc(astrologers::Column::Rating)
            .order_by_asc(astrologers::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(list.into_iter().map(Into::into).collect())
    }

    pub async fn get_public(&self, id: i64) -> AppResult<AstrologerDetail> {
        let astrologer = astrologers::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .filter(|a| a.is_publicly_visible())
            .ok_or_else(|| AppError::NotFound("Astrologer not found".to_string()))?;

        let review_list = reviews::Entity::find()
            .filter(reviews::Column::AstrologerId.eq(id))
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(AstrologerDetail {
            astrologer: astrologer.into(),
            reviews: review_list.into_iter().map(ReviewResponse::from).collect(),
        })
    }

    async fn find(&self, id: i64) -> AppResult<astrologers::Model> {
        astrologers::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Astrologer not found".to_string()))
    }

    pub async fn get_profile(&self, id: i64) -> AppResult<AstrologerProfile> {
        Ok(self.find(id).await?.into())
    }

    pub async fn update_profile(
        &self,
        id: i64,
        patch: UpdateAstrologerProfileRequest,
    ) -> AppResult<AstrologerProfile> {
        let current = self.find(id).await?;
        let mut am = current.into_active_model();

        if let Some(display_name) = patch.display_name.map(|n| n.trim().to_string()) {
            if display_name.is_empty() {
                return Err(AppError::ValidationError(
                    "display_name cannot be empty".to_string(),
                ));
            }
            am.name = Set(display_name);
        }
        if let Some(v) = patch.original_name {
            am.original_name = Set(Some(v));
        }
        if let Some(v) = patch.is_real_name_visible {
            am.is_real_name_visible = Set(v);
        }
        if let Some(phone) = patch.phone {
            let taken = astrologers::Entity::find()
                .filter(astrologers::Column::Phone.eq(phone.clone()))
                .filter(astrologers::Column::Id.ne(id))
                .one(&self.pool)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Phone already in use".to_string()));
            }
            am.phone = Set(Some(phone));
        }
        if let Some(v) = patch.profile_image {
            am.profile_image = Set(Some(v));
        }
        if let Some(v) = patch.bio {
            am.bio = Set(Some(v));
        }
        if let Some(v) = patch.expertise {
            am.expertise = Set(v);
        }
        if let Some(v) = patch.languages {
            am.languages = Set(v);
        }
        if let Some(v) = patch.experience {
            if v < 0 {
                return Err(AppError::ValidationError(
                    "experience cannot be negative".to_string(),
                ));
            }
            am.experience = Set(v);
        }
        if let Some(v) = patch.experience_desc {
            am.experience_desc = Set(Some(v));
        }
        if let Some(v) = patch.age {
            am.age = Set(Some(v));
        }
        if let Some(v) = patch.address {
            am.address = Set(Some(v));
        }
        if let Some(v) = patch.quoted_rate {
            if v < 0 {
                return Err(AppError::ValidationError(
                    "quoted_rate cannot be negative".to_string(),
                ));
            }
            am.quoted_rate = Set(Some(v));
        }
        if let Some(v) = patch.is_online {
            am.is_online = Set(v);
        }
        am.updated_at = Set(Utc::now());

        Ok(am.update(&self.pool).await?.into())
    }

    /// 管理后台：全部占星师（新的在前），附咨询数与评价数
    pub async fn list_all_for_admin(&self) -> AppResult<Vec<AstrologerAdminView>> {
        let list = astrologers::Entity::find()
            .order_by_desc(astrologers::Column::CreatedAt)
            .order_by_desc(astrologers::Column::Id)
            .all(&self.pool)
            .await?;

        let mut views = Vec::with_capacity(list.len());
        for a in list {
            let consultation_count = consultations::Entity::find()
                .filter(consultations::Column::AstrologerId.eq(a.id))
                .count(&self.pool)
                .await? as i64;
            let review_count = reviews::Entity::find()
                .filter(reviews::Column::AstrologerId.eq(a.id))
                .count(&self.pool)
                .await? as i64;
            views.push(AstrologerAdminView {
                astrologer: a.into(),
                consultation_count,
                review_count,
            });
        }
        Ok(views)
    }

    /// 审核通过并核定费率
    pub async fn approve(&self, id: i64, approved_rate: i64) -> AppResult<AstrologerProfile> {
        if approved_rate < 0 {
            return Err(AppError::ValidationError(
                "approved_rate cannot be negative".to_string(),
            ));
        }
        let mut am = self.find(id).await?.into_active_model();
        am.is_approved = Set(true);
        am.price_per_min = Set(approved_rate);
        am.quoted_rate = Set(Some(approved_rate));
        am.updated_at = Set(Utc::now());
        let updated = am.update(&self.pool).await?;
        log::info!("Astrologer {} approved at rate {}", id, approved_rate);
        Ok(updated.into())
    }

    pub async fn set_blocked(&self, id: i64, is_blocked: bool) -> AppResult<AstrologerProfile> {
        let mut am = self.find(id).await?.into_active_model();
        am.is_blocked = Set(is_blocked);
        am.updated_at = Set(Utc::now());
        let updated = am.update(&self.pool).await?;
        log::info!("Astrologer {} blocked={}", id, is_blocked);
        Ok(updated.into())
    }

    /// 写入评价并重算平均评分，同一事务
    pub async fn add_review(
        &self,
        astrologer_id: i64,
        user_id: i64,
        request: CreateReviewRequest,
    ) -> AppResult<AstrologerProfile> {
        if !(1..=5).contains(&request.rating) {
            return Err(AppError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;

        let astrologer = astrologers::Entity::find_by_id(astrologer_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Astrologer not found".to_string()))?;

        reviews::ActiveModel {
            user_id: Set(user_id),
            astrologer_id: Set(astrologer_id),
            rating: Set(request.rating),
            comment: Set(request.comment),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let ratings: Vec<i32> = reviews::Entity::find()
            .select_only()
            .column(reviews::Column::Rating)
            .filter(reviews::Column::AstrologerId.eq(astrologer_id))
            .into_tuple()
            .all(&txn)
            .await?;
        let rating = average_rating(&ratings).unwrap_or(astrologer.rating);

        let mut am = astrologer.into_active_model();
        am.rating = Set(rating);
        am.updated_at = Set(Utc::now());
        let updated = am.update(&txn).await?;

        txn.commit().await?;
        Ok(updated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[5]), Some(5.0));
        assert_eq!(average_rating(&[4, 5, 5]), Some(4.67));
        assert_eq!(average_rating(&[1, 2]), Some(1.5));
    }
}
