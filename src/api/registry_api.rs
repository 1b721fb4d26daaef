// ==========================================
// 染整批次登记系统 - 基础资料 API
// ==========================================
// 职责: 公司 / 中间人 / 材质 / 去向 的查询与新增
// 约束: 名称去首尾空白后唯一；重复新增不修改数据
// 附加: 新增公司时同步登记同名去向
// ==========================================

use std::sync::Arc;

use crate::api::dto::{NameRequest, RegistryEntryView};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::clock::FacilityClock;
use crate::domain::registry::{normalize_name, RegistryKind};
use crate::repository::error::RepositoryError;
use crate::repository::registry_repo::RegistryRepository;

/// 基础资料API
pub struct RegistryApi {
    company_repo: Arc<RegistryRepository>,
    mediator_repo: Arc<RegistryRepository>,
    material_type_repo: Arc<RegistryRepository>,
    destination_repo: Arc<RegistryRepository>,
    clock: FacilityClock,
}

impl RegistryApi {
    pub fn new(
        company_repo: Arc<RegistryRepository>,
        mediator_repo: Arc<RegistryRepository>,
        material_type_repo: Arc<RegistryRepository>,
        destination_repo: Arc<RegistryRepository>,
        clock: FacilityClock,
    ) -> Self {
        Self {
            company_repo,
            mediator_repo,
            material_type_repo,
            destination_repo,
            clock,
        }
    }

    fn repo(&self, kind: RegistryKind) -> &RegistryRepository {
        match kind {
            RegistryKind::Company => &self.company_repo,
            RegistryKind::Mediator => &self.mediator_repo,
            RegistryKind::MaterialType => &self.material_type_repo,
            RegistryKind::Destination => &self.destination_repo,
        }
    }

    /// 查询全部条目（按名称升序）
    pub fn list(&self, kind: RegistryKind) -> ApiResult<Vec<RegistryEntryView>> {
        let entries = self.repo(kind).list()?;
        Ok(entries
            .into_iter()
            .map(|e| RegistryEntryView::from_entry(e, &self.clock))
            .collect())
    }

    /// 新增条目
    ///
    /// # 返回
    /// - Err(ApiError::ValidationError): 名称缺失
    /// - Err(ApiError::DuplicateName): 名称已存在
    pub fn create(&self, kind: RegistryKind, req: &NameRequest) -> ApiResult<RegistryEntryView> {
        let name = req
            .name
            .as_deref()
            .and_then(normalize_name)
            .ok_or_else(|| ApiError::ValidationError(format!("{} name required", kind)))?;

        let repo = self.repo(kind);
        let result = match kind {
            RegistryKind::Company => repo.insert_company_with_destination(&name),
            _ => repo.insert(&name),
        };

        match result {
            Ok(entry) => {
                tracing::info!(
                    kind = %kind,
                    id = entry.id,
                    name = %entry.name,
                    "基础资料新增完成"
                );
                Ok(RegistryEntryView::from_entry(entry, &self.clock))
            }
            Err(RepositoryError::UniqueConstraintViolation(_)) => {
                tracing::warn!(kind = %kind, name = %name, "基础资料名称重复");
                Err(ApiError::DuplicateName { kind, name })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 存在则返回，不存在则创建
    pub fn ensure(&self, kind: RegistryKind, name: &str) -> ApiResult<RegistryEntryView> {
        let name = normalize_name(name)
            .ok_or_else(|| ApiError::ValidationError(format!("{} name required", kind)))?;
        let entry = self.repo(kind).ensure(&name)?;
        Ok(RegistryEntryView::from_entry(entry, &self.clock))
    }

    pub fn count(&self, kind: RegistryKind) -> ApiResult<i64> {
        Ok(self.repo(kind).count()?)
    }
}
