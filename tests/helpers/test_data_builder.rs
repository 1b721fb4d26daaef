// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use dyeing_tracker::api::dto::{BatchItemInput, BatchRequest, ExitBatchRequest};

// ==========================================
// BatchRequest 构建器
// ==========================================

pub struct BatchRequestBuilder {
    company_id: Option<i64>,
    lot_number: Option<String>,
    received_through_type: Option<String>,
    mediator_id: Option<i64>,
    items: Vec<BatchItemInput>,
}

impl BatchRequestBuilder {
    /// 直接收货、无明细
    pub fn new(company_id: i64, lot_number: &str) -> Self {
        Self {
            company_id: Some(company_id),
            lot_number: Some(lot_number.to_string()),
            received_through_type: Some("direct".to_string()),
            mediator_id: None,
            items: Vec::new(),
        }
    }

    pub fn via_mediator(mut self, mediator_id: Option<i64>) -> Self {
        self.received_through_type = Some("mediator".to_string());
        self.mediator_id = mediator_id;
        self
    }

    pub fn received_through(mut self, raw: Option<&str>) -> Self {
        self.received_through_type = raw.map(|s| s.to_string());
        self
    }

    pub fn mediator_id(mut self, mediator_id: Option<i64>) -> Self {
        self.mediator_id = mediator_id;
        self
    }

    pub fn item(mut self, material_type_id: i64, color: &str, rolls: Option<i64>) -> Self {
        self.items.push(BatchItemInput {
            material_type_id: Some(material_type_id),
            color: Some(color.to_string()),
            number_of_rolls: rolls,
        });
        self
    }

    pub fn build(self) -> BatchRequest {
        BatchRequest {
            company_id: self.company_id,
            lot_number: self.lot_number,
            items: Some(self.items),
            received_through_type: self.received_through_type,
            mediator_id: self.mediator_id,
        }
    }
}

// ==========================================
// ExitBatchRequest 构建器
// ==========================================

pub struct ExitRequestBuilder {
    req: ExitBatchRequest,
}

impl ExitRequestBuilder {
    /// 厂内运输
    pub fn internal(destination_id: i64) -> Self {
        Self {
            req: ExitBatchRequest {
                destination_id: Some(destination_id),
                notes: None,
                transport_type: Some("internal".to_string()),
                vehicle_registration: None,
            },
        }
    }

    /// 外部车辆运输
    pub fn external(destination_id: i64, vehicle_registration: &str) -> Self {
        Self {
            req: ExitBatchRequest {
                destination_id: Some(destination_id),
                notes: None,
                transport_type: Some("external".to_string()),
                vehicle_registration: Some(vehicle_registration.to_string()),
            },
        }
    }

    pub fn notes(mut self, notes: &str) -> Self {
        self.req.notes = Some(notes.to_string());
        self
    }

    pub fn vehicle_registration(mut self, raw: Option<&str>) -> Self {
        self.req.vehicle_registration = raw.map(|s| s.to_string());
        self
    }

    pub fn build(self) -> ExitBatchRequest {
        self.req
    }
}
