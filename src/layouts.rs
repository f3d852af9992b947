// 📚 Report Catalogue - every ERP export the ingester understands
// One ReportType per export job; each maps to a static ReportLayout.

use crate::classify::Labels;
use crate::extract::FieldSlice;
use crate::layout::{
    Coercion, Derivation, Extraction, MetadataStyle, MonthlyUnpivot, ReportLayout, RowFilter, Rule,
};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// REPORT TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    Vevw,
    Mb51,
    Mb52,
    Lx02,
    ZprlValue,
    ZprlQty,
    Zpcp13,
    PpFauf,
    ZcoMatBewert,
    Mm03,
    EordSourceList,
    Mb52SpareParts,
    Iw47OrderStaffTime,
    Mb51SpecifiedMvt,
    MmPurPr,
    CooisOutput,
    CooisOrderRouting,
    Se16PpQmeld,
    Se16Zpsollmin,
    Se16Ekkn,
    PpFertvers,
    CostReport,
    CooisHeader,
    Me5a,
    Ebkn,
    Iw39,
    MmPurPo,
    Csks,
    WorkCenter,
    Ih08,
    Ekko,
    RoutingPpAplan,
    BomPpStueli,
    BomPpStueliFuture,
    Mm03Whole,
    Cskt,
    ZpsegKst,
    DnMonitorZlsvn,
    CooisOrderComponent,
    Se16Draw,
    Zpseg,
}

impl ReportType {
    pub const ALL: [ReportType; 41] = [
        ReportType::Vevw,
        ReportType::Mb51,
        ReportType::Mb52,
        ReportType::Lx02,
        ReportType::ZprlValue,
        ReportType::ZprlQty,
        ReportType::Zpcp13,
        ReportType::PpFauf,
        ReportType::ZcoMatBewert,
        ReportType::Mm03,
        ReportType::EordSourceList,
        ReportType::Mb52SpareParts,
        ReportType::Iw47OrderStaffTime,
        ReportType::Mb51SpecifiedMvt,
        ReportType::MmPurPr,
        ReportType::CooisOutput,
        ReportType::CooisOrderRouting,
        ReportType::Se16PpQmeld,
        ReportType::Se16Zpsollmin,
        ReportType::Se16Ekkn,
        ReportType::PpFertvers,
        ReportType::CostReport,
        ReportType::CooisHeader,
        ReportType::Me5a,
        ReportType::Ebkn,
        ReportType::Iw39,
        ReportType::MmPurPo,
        ReportType::Csks,
        ReportType::WorkCenter,
        ReportType::Ih08,
        ReportType::Ekko,
        ReportType::RoutingPpAplan,
        ReportType::BomPpStueli,
        ReportType::BomPpStueliFuture,
        ReportType::Mm03Whole,
        ReportType::Cskt,
        ReportType::ZpsegKst,
        ReportType::DnMonitorZlsvn,
        ReportType::CooisOrderComponent,
        ReportType::Se16Draw,
        ReportType::Zpseg,
    ];

    /// Export job code, also the prefix of the exported file names
    pub fn code(&self) -> &'static str {
        match self {
            ReportType::Vevw => "02_VEVW",
            ReportType::Mb51 => "03_MB51",
            ReportType::Mb52 => "04_MB52",
            ReportType::Lx02 => "05_LX02",
            ReportType::ZprlValue => "06_ZPRL_VALUE",
            ReportType::ZprlQty => "07_ZPRL_QTY",
            ReportType::Zpcp13 => "08_ZPCP13",
            ReportType::PpFauf => "09_PP_FAUF",
            ReportType::ZcoMatBewert => "10_ZCO_MAT_BEWERT",
            ReportType::Mm03 => "11_MM03",
            ReportType::EordSourceList => "12_EORD_SOURCE_LIST",
            ReportType::Mb52SpareParts => "13_MB52_SPARE_PARTS",
            ReportType::Iw47OrderStaffTime => "14_IW47_ORDER_STAFF_TIME",
            ReportType::Mb51SpecifiedMvt => "15_MB51_SPECIFIED_MVT",
            ReportType::MmPurPr => "16_MM_PUR_PR",
            ReportType::CooisOutput => "17_COOIS_OUTPUT",
            ReportType::CooisOrderRouting => "18_COOIS_ORDER_ROUTING",
            ReportType::Se16PpQmeld => "19_SE16_PP_QMELD",
            ReportType::Se16Zpsollmin => "20_SE16_ZPSOLLMIN",
            ReportType::Se16Ekkn => "21_SE16_EKKN",
            ReportType::PpFertvers => "22_PP_FERTVERS",
            ReportType::CostReport => "23_Y_ED1_27000648",
            ReportType::CooisHeader => "24_COOIS_HEADER",
            ReportType::Me5a => "25_ME5A",
            ReportType::Ebkn => "26_EBKN",
            ReportType::Iw39 => "27_IW39",
            ReportType::MmPurPo => "28_MM_PUR_PO",
            ReportType::Csks => "29_CSKS",
            ReportType::WorkCenter => "30_WORK_CENTER",
            ReportType::Ih08 => "31_IH08",
            ReportType::Ekko => "32_EKKO",
            ReportType::RoutingPpAplan => "33_ROUTING_PP_APLAN",
            ReportType::BomPpStueli => "34_BOM_PP_STUELI",
            ReportType::BomPpStueliFuture => "35_BOM_PP_STUELI_FUTURE",
            ReportType::Mm03Whole => "36_MM03_WHOLE",
            ReportType::Cskt => "37_CSKT",
            ReportType::ZpsegKst => "38_ZPSEG_KST",
            ReportType::DnMonitorZlsvn => "39_DN_MONITOR_ZLSVN",
            ReportType::CooisOrderComponent => "40_COOIS_ORDER_COMPONENT",
            ReportType::Se16Draw => "41_SE16_DRAW",
            ReportType::Zpseg => "42_ZPSEG",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ReportType::Vevw => "Change pointers",
            ReportType::Mb51 => "Material document list",
            ReportType::Mb52 => "Warehouse stock",
            ReportType::Lx02 => "Warehouse bin stock",
            ReportType::ZprlValue => "Backlog by value",
            ReportType::ZprlQty => "Backlog by quantity",
            ReportType::Zpcp13 => "Monthly demand plan",
            ReportType::PpFauf => "Production orders",
            ReportType::ZcoMatBewert => "Material valuation",
            ReportType::Mm03 => "Material master",
            ReportType::EordSourceList => "Source list",
            ReportType::Mb52SpareParts => "Spare parts stock",
            ReportType::Iw47OrderStaffTime => "Maintenance confirmations",
            ReportType::Mb51SpecifiedMvt => "Material documents by movement type",
            ReportType::MmPurPr => "Purchase requisitions",
            ReportType::CooisOutput => "Production confirmations",
            ReportType::CooisOrderRouting => "Order operations",
            ReportType::Se16PpQmeld => "Scrap notifications",
            ReportType::Se16Zpsollmin => "Target minutes",
            ReportType::Se16Ekkn => "PO account assignment",
            ReportType::PpFertvers => "Production versions",
            ReportType::CostReport => "Plant cost report",
            ReportType::CooisHeader => "Order headers",
            ReportType::Me5a => "Purchase requisition list",
            ReportType::Ebkn => "PR account assignment",
            ReportType::Iw39 => "Maintenance orders",
            ReportType::MmPurPo => "Purchase orders",
            ReportType::Csks => "Cost centre master",
            ReportType::WorkCenter => "Work centres",
            ReportType::Ih08 => "Equipment",
            ReportType::Ekko => "Purchasing document headers",
            ReportType::RoutingPpAplan => "Routings",
            ReportType::BomPpStueli => "Bills of material",
            ReportType::BomPpStueliFuture => "Bills of material (future)",
            ReportType::Mm03Whole => "Material master (full)",
            ReportType::Cskt => "Cost centre texts",
            ReportType::ZpsegKst => "Segment cost centres",
            ReportType::DnMonitorZlsvn => "Delivery monitor",
            ReportType::CooisOrderComponent => "Order components",
            ReportType::Se16Draw => "Document info records",
            ReportType::Zpseg => "Segments",
        }
    }

    /// Two-digit job number (the `NN_` prefix)
    pub fn number(&self) -> u32 {
        self.code()
            .split('_')
            .next()
            .and_then(|n| n.parse().ok())
            .unwrap_or(0)
    }

    /// Case-insensitive lookup by full code (`03_MB51`), number (`3`, `03`)
    /// or code without the number (`MB51`)
    pub fn from_code(code: &str) -> Option<ReportType> {
        let wanted = code.trim().to_uppercase();
        if let Ok(n) = wanted.parse::<u32>() {
            return Self::ALL.iter().copied().find(|r| r.number() == n);
        }
        Self::ALL.iter().copied().find(|r| {
            let full = r.code();
            full == wanted || full.split_once('_').map(|(_, rest)| rest) == Some(wanted.as_str())
        })
    }

    pub fn layout(&self) -> &'static ReportLayout {
        match self {
            ReportType::Vevw => &VEVW,
            ReportType::Mb51 => &MB51,
            ReportType::Mb52 => &MB52,
            ReportType::Lx02 => &LX02,
            ReportType::ZprlValue => &ZPRL_VALUE,
            ReportType::ZprlQty => &ZPRL_QTY,
            ReportType::Zpcp13 => &ZPCP13,
            ReportType::PpFauf => &PP_FAUF,
            ReportType::ZcoMatBewert => &ZCO_MAT_BEWERT,
            ReportType::Mm03 => &MM03,
            ReportType::EordSourceList => &EORD_SOURCE_LIST,
            ReportType::Mb52SpareParts => &MB52_SPARE_PARTS,
            ReportType::Iw47OrderStaffTime => &IW47,
            ReportType::Mb51SpecifiedMvt => &MB51_SPECIFIED_MVT,
            ReportType::MmPurPr => &MM_PUR_PR,
            ReportType::CooisOutput => &COOIS_OUTPUT,
            ReportType::CooisOrderRouting => &COOIS_ORDER_ROUTING,
            ReportType::Se16PpQmeld => &SE16_PP_QMELD,
            ReportType::Se16Zpsollmin => &SE16_ZPSOLLMIN,
            ReportType::Se16Ekkn => &SE16_EKKN,
            ReportType::PpFertvers => &PP_FERTVERS,
            ReportType::CostReport => &COST_REPORT,
            ReportType::CooisHeader => &COOIS_HEADER,
            ReportType::Me5a => &ME5A,
            ReportType::Ebkn => &EBKN,
            ReportType::Iw39 => &IW39,
            ReportType::MmPurPo => &MM_PUR_PO,
            ReportType::Csks => &CSKS,
            ReportType::WorkCenter => &WORK_CENTER,
            ReportType::Ih08 => &IH08,
            ReportType::Ekko => &EKKO,
            ReportType::RoutingPpAplan => &ROUTING_PP_APLAN,
            ReportType::BomPpStueli => &BOM_PP_STUELI,
            ReportType::BomPpStueliFuture => &BOM_PP_STUELI_FUTURE,
            ReportType::Mm03Whole => &MM03_WHOLE,
            ReportType::Cskt => &CSKT,
            ReportType::ZpsegKst => &ZPSEG_KST,
            ReportType::DnMonitorZlsvn => &DN_MONITOR_ZLSVN,
            ReportType::CooisOrderComponent => &COOIS_ORDER_COMPONENT,
            ReportType::Se16Draw => &SE16_DRAW,
            ReportType::Zpseg => &ZPSEG,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// SHORTHANDS
// ============================================================================

const DOT_DATE: &str = "%Y.%m.%d";

const NORM: Rule = Rule::Normalize;
const COMMAS: Rule = Rule::StripCommas;
const NUM: Rule = Rule::ToNumber(Coercion::Strict);
const NUM_OR_MISSING: Rule = Rule::ToNumber(Coercion::Lenient);
const DATE: Rule = Rule::ToDate(DOT_DATE, Coercion::Lenient);
const STRICT_DATE: Rule = Rule::ToDate(DOT_DATE, Coercion::Strict);
const DAY_FIRST_DATE: Rule = Rule::ToDate("%d.%m.%Y", Coercion::Lenient);
const COMPACT_DATE: Rule = Rule::ToDate("%Y%m%d", Coercion::Lenient);
/// `year_month_day` metadata text back to a date
const ISO_DATE: Rule = Rule::ToDate("%Y-%m-%d", Coercion::Lenient);

const STAR: &[&str] = &["*"];

const fn not_star(field: &'static str) -> RowFilter {
    RowFilter::KeyEquals {
        field,
        sentinels: STAR,
    }
}

// ============================================================================
// LAYOUTS 02 - 10
// ============================================================================

const VEVW: ReportLayout = ReportLayout::pipes(
    &["client", "handle", "object_type", "object_key", "time_stamp", "direction"],
    FieldSlice::range(2, 8),
)
.filters(&[not_star("object_key")]);

const MB51: ReportLayout = ReportLayout::pipes(
    &[
        "material_number",
        "material_desc",
        "plant",
        "name",
        "stock_location",
        "movement_type_desc",
        "movement_type",
        "supplier",
        "PO",
        "material_document",
        "batch",
        "posting_date",
        "quantity",
        "amount_LC",
        "user",
        "document_header_desc",
        "reference",
    ],
    FieldSlice::range(1, 18),
)
.filters(&[not_star("material_number")])
.rules(&[("posting_date", DATE), ("quantity", NORM)]);

const MB52: ReportLayout = ReportLayout::pipes(
    &[
        "material_number",
        "material_desc",
        "material_type",
        "batch",
        "S_loc",
        "unrestricted",
        "value_unrestricted",
        "blocked_quantity",
        "blocked_value",
        "S",
        "special_block_number",
    ],
    FieldSlice::range(1, 12),
)
.filters(&[not_star("material_number")])
.rules(&[
    ("unrestricted", NORM),
    ("blocked_quantity", NORM),
    ("blocked_value", NORM),
    ("unrestricted", NUM),
    ("blocked_quantity", NUM),
    ("blocked_value", NUM),
    ("year_month_day", ISO_DATE),
])
// the export job fills the value column from the quantity column
.derived(&[Derivation::CopyColumn {
    target: "value_unrestricted",
    source: "unrestricted",
}]);

const LX02: ReportLayout = ReportLayout::pipes(
    &[
        "material_number",
        "plant",
        "S_loc",
        "S",
        "batch",
        "S_1",
        "special_block_number",
        "material_desc",
        "storage_unit",
        "type",
        "storage_bin",
        "available_stock",
        "pick_quantity",
        "stock_for_put_away",
        "unit",
        "GR_date",
        "GR_number",
        "to_it",
        "to_quant",
        "to_number",
    ],
    FieldSlice::range(1, 21),
)
.metadata(MetadataStyle::Warehouse { line: 2, chars: 3 })
.rules(&[
    ("GR_date", DATE),
    ("available_stock", NORM),
    ("pick_quantity", NORM),
    ("stock_for_put_away", NORM),
    ("available_stock", NUM),
    ("pick_quantity", NUM),
    ("stock_for_put_away", NUM),
    ("year_month_day", ISO_DATE),
]);

/// Backlog exports list pieces in a different order than the output columns
const fn zprl(pieces: &'static [&'static str], order: &'static [&'static str]) -> ReportLayout {
    ReportLayout::pipes(pieces, FieldSlice::range(1, 14))
        .column_order(order)
        .metadata(MetadataStyle::PreviousDay)
        .filters(&[RowFilter::KeyMinLength {
            field: "material_number",
            len: 9,
        }])
}

const ZPRL_VALUE: ReportLayout = zprl(
    &[
        "plant",
        "material_number",
        "material_type",
        "transfer_plant",
        "segment",
        "sold_to_party",
        "name",
        "material_desc",
        "cont_grp_customer",
        "customer_material",
        "backlog_value",
        "warehouse_stock",
        "in_delivery",
    ],
    &[
        "plant",
        "material_number",
        "warehouse_stock",
        "transfer_plant",
        "in_delivery",
        "segment",
        "sold_to_party",
        "name",
        "material_desc",
        "cont_grp_customer",
        "customer_material",
        "backlog_value",
        "material_type",
    ],
)
.rules(&[("backlog_value", NORM), ("backlog_value", NUM)]);

const ZPRL_QTY: ReportLayout = zprl(
    &[
        "plant",
        "material_number",
        "material_type",
        "transfer_plant",
        "segment",
        "sold_to_party",
        "name",
        "material_desc",
        "cont_grp_customer",
        "customer_material",
        "backlog_quantity",
        "warehouse_stock",
        "in_delivery",
    ],
    &[
        "plant",
        "material_number",
        "warehouse_stock",
        "transfer_plant",
        "in_delivery",
        "segment",
        "sold_to_party",
        "name",
        "material_desc",
        "cont_grp_customer",
        "customer_material",
        "backlog_quantity",
        "material_type",
    ],
)
.rules(&[("backlog_quantity", NORM), ("backlog_quantity", NUM)]);

const ZPCP13_MONTHS: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"];

const ZPCP13: ReportLayout = ReportLayout::pipes(
    &[
        "MRP_controller",
        "MRP_group",
        "material_desc",
        "material_number",
        "days_supply",
        "category",
        "stock",
        "stock_p_plant",
        "backlog",
        "0",
        "1",
        "2",
        "3",
        "4",
        "5",
        "6",
        "7",
        "8",
        "9",
        "10",
        "11",
        "12",
        "total",
        "total_without_stock",
        "unit",
        "segment",
        "production_type",
        "production_type_desc",
        "MRP_lot_size",
        "min_lot_size",
        "plan_delivery_time",
        "safety_stock",
        "target_stock",
        "safety_time",
        "inhouse_production_time",
        "planning_time_fence",
        "purchase_group",
        "supplier",
        "plant_status",
        "stochastic_type",
        "ABC",
        "XYZ",
        "production_hierachy",
        "quality_inspection",
        "blocked",
        "configuable_material",
        "MRP_type",
        "LS",
        "target_stock_over",
        "stock_type",
        "round_value",
        "material_type",
        "material_group",
        "GR_processing_time",
        "annual_demand",
        "budget_year_requirement",
        "purchase_group_desc",
        "consumption_current_year_2",
        "consumption_current_year_1",
        "consumption_current_year",
    ],
    FieldSlice::range(1, 61),
)
.unpivot(MonthlyUnpivot {
    header_line: 2,
    header_piece: 10,
    tail_chars: 8,
    month_fields: ZPCP13_MONTHS,
    var_name: "date",
    value_name: "quantity",
})
.rules(&[
    ("stock", NORM),
    ("backlog", NORM),
    ("total", NORM),
    ("total_without_stock", NORM),
    ("min_lot_size", NORM),
    ("target_stock", NORM),
    ("blocked", NORM),
    ("round_value", NORM),
    ("annual_demand", NORM),
    ("budget_year_requirement", NORM),
    ("quantity", NORM),
]);

const PP_FAUF: ReportLayout = ReportLayout::pipes(
    &[
        "oder_number",
        "order_type",
        "segment",
        "MRP_controller",
        "material_number",
        "material_desc",
        "basic_start_date",
        "basic_finish_date",
        "actual_finish_date",
        "order_quantity",
        "confirmed_quantity",
        "unit",
        "printed",
        "system_status_head",
        "confirm_enter_by",
        "confirm_date",
        "work_center",
    ],
    FieldSlice::range(1, 18),
);

const ZCO_MAT_BEWERT: ReportLayout = ReportLayout::pipes(
    &[
        "plant",
        "segment",
        "material_number",
        "material_desc",
        "price_control",
        "valuation_class",
        "special_procurement",
        "price_unit",
        "GPC",
        "base_unit_of_measure",
        "moving_price",
        "standard_price",
        "GPC_date",
        "planned_price",
        "planned_price_date",
    ],
    FieldSlice::range(1, 16),
)
.rules(&[
    ("GPC_date", DAY_FIRST_DATE),
    ("planned_price_date", DAY_FIRST_DATE),
    ("price_unit", NORM),
    ("GPC", NORM),
    ("moving_price", NORM),
    ("standard_price", NORM),
    ("planned_price", NORM),
    ("price_unit", NUM),
    ("GPC", NUM),
    ("moving_price", NUM),
    ("standard_price", NUM),
    ("planned_price", NUM),
]);

// ============================================================================
// LAYOUTS 11 - 20
// ============================================================================

/// Material master columns shared by the plant and full exports, minus the last one
macro_rules! material_master_fields {
    ($last:literal) => {
        &[
            "plant",
            "segment",
            "material_number",
            "material_desc",
            "material_type",
            "assembly_scrap_ratio",
            "component_scrap_ratio",
            "prod_stor_location",
            "storage_loc_for_EP",
            "procurement_type",
            "special_procurement",
            "plant_sp_material_status",
            "price_control",
            "valuation_class",
            "MRP_controller",
            "prodn_supervisor",
            "backflush",
            "availability_check",
            "tot_repl_lead_time",
            "consumption_mode",
            "planning_strategy_group",
            "fwd_consumption_per",
            "bwd_consumption_per",
            "individual_coll",
            "selection_method",
            "GR_processing_time",
            "planned_delivery_time",
            "planning_time_fence",
            "in_house_production",
            "lot_size",
            "min_lot_size",
            "max_lot_size",
            "MRP_group",
            "MRP_type",
            "period_indicator",
            "safety_stock",
            "safety_time_ind",
            "safety_time_act_cov",
            "discontinuation_ind",
            "effective_out_date",
            "follow_up_material",
            "costing_lot_size",
            "budget_lot_size",
            "lab_office",
            "material_group",
            "planning_calendar",
            "product_hierarchy",
            "product_manager",
            "profit_center",
            "quota_arr_usage",
            "reorder_point",
            "spec_procurem_costing",
            "budget_flag_MRP",
            "budget_flag_calculation",
            "net_weight",
            "net_weight_unit",
            $last,
        ]
    };
}

const MM03: ReportLayout = ReportLayout::pipes(material_master_fields!("weight_date"), FieldSlice::range(1, 58))
    .rules(&[
        ("assembly_scrap_ratio", NORM),
        ("component_scrap_ratio", NORM),
        ("net_weight", NORM),
        ("assembly_scrap_ratio", NUM),
        ("component_scrap_ratio", NUM),
        ("net_weight", NUM),
        ("weight_date", DATE),
    ]);

const EORD_SOURCE_LIST: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "material_number",
        "plant",
        "number",
        "created_date",
        "created_by",
        "valid_from",
        "valid_to",
        "supplier",
        "fixed_vendor",
        "schedule_agreement",
        "item",
        "fixed_agreement_item",
        "procurement_plant",
        "fixed_issue_plant",
        "MPN_material",
        "blocked",
        "purchase_organization",
        "document_category",
        "source_category",
        "MRP",
        "order_unit",
        "logical_system",
        "special_stock",
        "central_contract",
        "central_contract_item",
    ],
    FieldSlice::range(2, 28),
);

const MB52_SPARE_PARTS: ReportLayout = ReportLayout::pipes(
    &[
        "material_number",
        "plant",
        "stock_location",
        "special_stock_category",
        "valuation",
        "special_stock_number",
        "stock_location_deletion_flag",
        "batch",
        "unit",
        "stock_unrestricted",
        "stock_segment",
        "currency",
        "value_unrestricted",
        "stock_in_transit",
        "value_in_transit",
        "stock_in_quality_inspection",
        "value_in_quality_inspection",
        "stock_restricted",
        "value_restricted",
        "stock_blocked",
        "value_blocked",
        "stock_returned",
        "value_returned",
    ],
    FieldSlice::range(1, 24),
)
.filters(&[not_star("material_number")])
.rules(&[
    ("stock_unrestricted", COMMAS),
    ("value_unrestricted", COMMAS),
    ("stock_in_transit", COMMAS),
    ("value_in_transit", COMMAS),
    ("stock_in_quality_inspection", COMMAS),
    ("value_in_quality_inspection", COMMAS),
    ("stock_restricted", COMMAS),
    ("value_restricted", COMMAS),
    ("stock_blocked", COMMAS),
    ("value_blocked", COMMAS),
    ("stock_returned", COMMAS),
    ("value_returned", COMMAS),
]);

const IW47: ReportLayout = ReportLayout::pipes(
    &[
        "order_type",
        "plant",
        "work_center",
        "activity_type",
        "order",
        "confirmation",
        "posting_date",
        "actual_start_date",
        "actual_start_time",
        "actual_finish_time",
        "employee_ID",
        "employee_name",
        "actual_work_minutes",
        "unit",
        "created_date",
        "created_by",
        "reverse",
    ],
    FieldSlice::range(1, 18),
)
.filters(&[RowFilter::KeyEquals {
    field: "order",
    sentinels: &["*", ""],
}])
.rules(&[
    ("posting_date", DATE),
    ("actual_start_date", DATE),
    ("created_date", DATE),
    ("actual_work_minutes", COMMAS),
    ("actual_work_minutes", NUM),
]);

const MB51_SPECIFIED_MVT: ReportLayout = ReportLayout::pipes(
    &[
        "material_number",
        "plant",
        "name",
        "stock_location",
        "movement_type_desc",
        "movement_type",
        "supplier",
        "PO",
        "material_document",
        "batch",
        "posting_date",
        "quantity",
        "unit",
        "amount_LC",
        "user",
        "document_header_desc",
        "reference",
        "cost_center",
        "order",
        "material_desc",
    ],
    FieldSlice::range(1, 21).with_max_split(20),
)
.filters(&[not_star("material_number")])
.rules(&[
    ("material_desc", Rule::DropLastChar),
    ("posting_date", DATE),
    ("quantity", NORM),
    ("amount_LC", NORM),
    ("quantity", NUM_OR_MISSING),
    ("amount_LC", NUM_OR_MISSING),
    ("name", Rule::Uppercase),
    ("movement_type_desc", Rule::Uppercase),
    ("user", Rule::Uppercase),
    ("material_desc", Rule::Uppercase),
]);

const MM_PUR_PR: ReportLayout = ReportLayout::pipes(
    &[
        "plant",
        "material_group",
        "material_number",
        "material_desc",
        "vendor_name",
        "PO",
        "PO_item",
        "order",
        "PR_item_quantity",
        "unit_1",
        "unit_2",
        "price_unit",
        "cost_center",
        "account_assignment_category",
        "GL_account",
        "PO_date",
        "currency",
        "PR",
        "PR_item",
        "receive_cost_center",
        "request_cost_center",
        "requested_by",
        "WBS_element",
        "purchase_document_type",
        "segment_number",
        "short_text",
    ],
    FieldSlice::range(1, 27).with_max_split(26),
)
.filters(&[not_star("plant")])
.rules(&[
    ("PR_item_quantity", COMMAS),
    ("price_unit", COMMAS),
    ("PO_date", DATE),
    ("short_text", Rule::DropLastChar),
    ("PR_item", Rule::ZeroPad(5)),
    ("PO_item", Rule::ZeroPad(5)),
    ("segment_number", Rule::ZeroPad(6)),
])
.derived(&[Derivation::ProcurementType { target: "PR_type" }]);

const COOIS_OUTPUT: ReportLayout = ReportLayout::pipes(
    &[
        "plant",
        "order_number",
        "activity",
        "operation_quantity",
        "confirmation_number",
        "confirmation_counter",
        "posting_date",
        "shift",
        "work_center",
        "unit",
        "production_minute",
        "OK_quantity",
        "confirmation_minute",
        "rework_quantity",
        "scrap_quantity",
        "confirmation_type",
        "reversed_flag",
        "cancelled_confirmation_flag",
        "created_date",
        "Germany_time",
        "entered_by",
        "material_number",
        "material_desc",
        "machine_work_center",
        "Chinese_time",
    ],
    FieldSlice::range(1, 26),
)
.rules(&[
    ("operation_quantity", NORM),
    ("production_minute", NORM),
    ("OK_quantity", NORM),
    ("confirmation_minute", NORM),
    ("rework_quantity", NORM),
    ("scrap_quantity", NORM),
    ("operation_quantity", NUM),
    ("production_minute", NUM),
    ("OK_quantity", NUM),
    ("confirmation_minute", NUM),
    ("rework_quantity", NUM),
    ("scrap_quantity", NUM),
    ("posting_date", STRICT_DATE),
    ("created_date", STRICT_DATE),
]);

const COOIS_ORDER_ROUTING: ReportLayout = ReportLayout::pipes(
    &[
        "order_number",
        "control_key",
        "activity",
        "setup_time_machine",
        "production_time_machine",
        "additional_time_machine",
        "number_staff_setup",
        "number_staff_production",
        "base_quantity",
        "work_center",
        "work_center_desc",
        "production_quantity",
        "yield_quantity",
        "scrap_quantity",
        "rework_quantity",
        "operation_start_date",
        "operation_start_time",
        "operation_finish_date",
        "operation_finish_time",
        "system_status",
        "equivalence_tool",
    ],
    FieldSlice::until_last(1),
)
.rules(&[
    ("setup_time_machine", NORM),
    ("production_time_machine", NORM),
    ("additional_time_machine", NORM),
    ("number_staff_setup", NORM),
    ("number_staff_production", NORM),
    ("base_quantity", NORM),
    ("production_quantity", NORM),
    ("yield_quantity", NORM),
    ("scrap_quantity", NORM),
    ("rework_quantity", NORM),
    ("setup_time_machine", NUM),
    ("production_time_machine", NUM),
    ("additional_time_machine", NUM),
    ("number_staff_setup", NUM),
    ("number_staff_production", NUM),
    ("base_quantity", NUM),
    ("production_quantity", NUM),
    ("yield_quantity", NUM),
    ("scrap_quantity", NUM),
    ("rework_quantity", NUM),
    ("operation_start_date", DATE),
    ("operation_finish_date", DATE),
    ("equivalence_tool", NUM),
]);

const SE16_PP_QMELD: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "order_number",
        "sequence",
        "operation",
        "confirmation_counter",
        "posting_date",
        "work_center",
        "shift",
        "scrap_indicator",
        "quantity",
        "error_key",
        "burdening_plant",
        "burdening_cost_center",
        "burdening_work_center",
        "production_quantity",
        "operation_unit",
        "material_number",
        "plant",
        "cost_center",
        "work_center_category",
        "created_date",
        "created_time",
        "employee_ID",
        "down_time",
        "notification",
        "confirmation",
        "confirmation_counter_2",
        "type_of_message",
        "check_box",
        "deletion_flag",
        "change_document",
    ],
    FieldSlice::range(2, 33),
)
.rules(&[
    ("posting_date", DATE),
    ("created_date", DATE),
    ("quantity", NORM),
    ("production_quantity", NORM),
    ("down_time", NORM),
    ("quantity", NUM),
    ("production_quantity", NUM),
    ("down_time", NUM),
]);

const SE16_ZPSOLLMIN: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "plant",
        "cost_center",
        "work_center",
        "date",
        "shift",
        "target_minutes_shift_model",
        "target_minutes",
        "posting_minutes",
        "posting_date",
        "posting_time",
        "varient_shift",
        "KZ_Bedarfsma",
        "gepl_Einsatzmin",
        "KZ_U_Schicht",
        "pause_Enisatzzeit",
        "BUMIN_masch_stillst",
        "ist_einsatzmin",
    ],
    FieldSlice::range(2, 20),
)
.rules(&[
    ("date", DATE),
    ("posting_date", DATE),
    ("target_minutes_shift_model", COMMAS),
    ("target_minutes", COMMAS),
    ("posting_minutes", COMMAS),
]);

// ============================================================================
// LAYOUTS 21 - 30
// ============================================================================

const SE16_EKKN: ReportLayout = ReportLayout::pipes(
    &[
        "clint",
        "PO",
        "PO_item",
        "account_assignment_squence",
        "deletion_flag",
        "created_on",
        "change_flag",
        "quantity",
        "percent",
        "net_value",
        "GL_account",
        "business_area",
        "cost_center",
        "not_in_use",
        "SD_document",
        "item",
        "schedule_line_number",
        "gross_requirement_flag",
        "asset",
        "sub_number",
        "order",
        "recipient",
        "unloading_point",
        "controlling_area",
        "post_to_cost_center",
        "post_to_order",
        "post_to_project",
        "final_invoice",
        "cost_object",
        "segment_number",
        "profit_center",
        "WBS_element",
    ],
    FieldSlice::range(2, 34),
)
.rules(&[("created_on", DATE), ("net_value", COMMAS)]);

const PP_FERTVERS: ReportLayout = ReportLayout::pipes(
    &[
        "plant",
        "segment",
        "material_number",
        "lock_flag",
        "short_name",
        "long_material_description",
        "version",
        "material_status",
        "product_hierarchy",
        "task_list_type",
        "group",
        "group_count",
        "routing_usage",
        "routing_satus",
        "alternative_bom",
        "bom_status",
        "bom_usage",
        "text",
        "valid_from",
        "valid_to",
        "selection_method",
        "material_description",
    ],
    FieldSlice::range(1, 23),
)
.rules(&[("valid_from", DATE)]);

/// Cost amount columns of the plant cost report
const COST_AMOUNTS: [&str; 6] = [
    "plan_cost_in_CNY",
    "actual_cost_in_CNY",
    "deviation_in_CNY",
    "plan_YTD_cost_in_CNY",
    "actual_YTD_cost_in_CNY",
    "YTD_deviation_in_CNY",
];

const COST_REPORT: ReportLayout = ReportLayout::pipes(
    &[
        "cost_category",
        "plan_cost_in_CNY",
        "actual_cost_in_CNY",
        "deviation_in_CNY",
        "deviation_percentage",
        "plan_YTD_cost_in_CNY",
        "actual_YTD_cost_in_CNY",
        "YTD_deviation_in_CNY",
        "YTD_deviation_percentage",
    ],
    FieldSlice::range(1, 10),
)
.extraction(Extraction::PipesWithMinCount {
    slice: FieldSlice::range(1, 10),
    min_pipes: 10,
})
.metadata(MetadataStyle::CostReport)
.rules(&[
    ("cost_category", Rule::RemoveChar('*')),
    (COST_AMOUNTS[0], NORM),
    (COST_AMOUNTS[1], NORM),
    (COST_AMOUNTS[2], NORM),
    (COST_AMOUNTS[3], NORM),
    (COST_AMOUNTS[4], NORM),
    (COST_AMOUNTS[5], NORM),
])
.then(
    &[RowFilter::NonEmpty {
        field: "cost_category",
    }],
    &[
        (COST_AMOUNTS[0], NUM),
        (COST_AMOUNTS[1], NUM),
        (COST_AMOUNTS[2], NUM),
        (COST_AMOUNTS[3], NUM),
        (COST_AMOUNTS[4], NUM),
        (COST_AMOUNTS[5], NUM),
    ],
);

const COOIS_HEADER: ReportLayout = ReportLayout::pipes(
    &[
        "order",
        "order_type",
        "material_number",
        "material_desc",
        "alternative_BOM",
        "explosion_date",
        "MRP_controller",
        "production_supervisor",
        "target_quantity",
        "delivery_quantity",
        "confirmed_quantity",
        "scrap_quantity",
        "rework_quantity",
        "unit",
        "basic_start_date",
        "basic_finish_date",
        "actual_finish_date",
        "system_status",
        "routing_group_counter",
    ],
    FieldSlice::range(1, 20),
)
.rules(&[
    ("explosion_date", DATE),
    ("target_quantity", NORM),
    ("delivery_quantity", NORM),
    ("confirmed_quantity", NORM),
    ("scrap_quantity", NORM),
    ("rework_quantity", NORM),
    ("target_quantity", NUM),
    ("delivery_quantity", NUM),
    ("confirmed_quantity", NUM),
    ("scrap_quantity", NUM),
    ("rework_quantity", NUM),
    ("basic_start_date", DATE),
    ("basic_finish_date", DATE),
    ("actual_finish_date", DATE),
]);

const ME5A: ReportLayout = ReportLayout::pipes(
    &[
        "purchased_organization",
        "plant",
        "purchase_group",
        "S",
        "document_type",
        "PR",
        "PR_item",
        "PO",
        "material_number",
        "MRP_controller",
        "stock_location",
        "delivery_date_category",
        "delivery_date",
        "fixed_vendor",
        "vendor_name",
        "supplier_plant",
        "requested_by",
        "quantity",
        "unit",
        "creation_flag",
        "overall_release",
        "release_date",
        "unit_price",
        "price_unit",
        "total_value",
        "currency",
        "created_by",
        "requisition_date",
        "changed_date",
        "vendor_material_number",
        "consumption",
        "PO_date",
        "customer",
        "vendor",
        "manufacturer",
        "external_manufacturer",
        "deletion_flag",
        "release_flag",
        "PR_item_desc",
    ],
    FieldSlice::range(1, 40),
)
.rules(&[
    ("PR_item_desc", Rule::DropLastChar),
    ("PR_item", Rule::ZeroPad(5)),
    ("delivery_date", COMPACT_DATE),
    ("quantity", COMMAS),
    ("unit_price", COMMAS),
    ("price_unit", COMMAS),
    ("total_value", COMMAS),
    ("release_date", DATE),
    ("requisition_date", DATE),
    ("changed_date", DATE),
    ("PO_date", DATE),
]);

const EBKN: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "PR",
        "PR_item",
        "account_assignment",
        "deletion_flag",
        "created_date",
        "created_by",
        "requested_quantity",
        "percentage",
        "GL_account",
        "business_area",
        "cost_center",
        "not_in_use",
        "SD_document",
        "SD_document_item",
        "schedule_line_number",
        "asset",
        "sub_number",
        "order",
        "recipient",
        "unloading_point",
        "controlling_area",
        "posting_to_cost_center",
        "posting_to_order",
        "posting_to_project",
        "cost_object",
        "profit_segment",
        "profit_center",
        "WBS_element",
        "network",
        "routing_number_for_operations_1",
        "real_estate_key",
        "counter_1",
        "partner",
        "commitment_item",
        "recovery_flag",
        "request_cost_center",
        "transport_cost_center",
        "receiving_cost_center",
        "follow_up_cost_center",
        "requested_by",
    ],
    FieldSlice::range(2, 43),
)
.rules(&[("requested_quantity", COMMAS)]);

const IW39: ReportLayout = ReportLayout::pipes(
    &[
        "selected_line",
        "order_type",
        "maintenance_type",
        "long_text_exist",
        "priority_text",
        "order",
        "description",
        "user_status",
        "equipment",
        "object_description",
        "plant_section",
        "basic_start_date",
        "basic_finish_date",
        "plant",
        "main_work_center",
        "currency",
        "actual_total_cost",
        "plan_total_cost",
        "estimated_cost",
        "created_on",
        // column name carries two trailing spaces in the downstream schema
        "entered_by  ",
        "changed_on",
        "changed_by",
        "responsible_cost_center",
        "system_status",
        "message",
        "profit_center",
        "cost_center",
    ],
    FieldSlice::range(1, 29),
)
.filters(&[RowFilter::KeyMinLength { field: "order", len: 9 }])
.rules(&[
    ("basic_start_date", DATE),
    ("basic_finish_date", DATE),
    ("created_on", DATE),
    ("changed_on", DATE),
    ("actual_total_cost", COMMAS),
    ("plan_total_cost", COMMAS),
    ("estimated_cost", COMMAS),
]);

const MM_PUR_PO: ReportLayout = ReportLayout::pipes(
    &[
        "plant",
        "country",
        "material_group",
        "material_number",
        "material_desc",
        "supplier",
        "vendor_name",
        "valid_start",
        "valid_end",
        "next_FRC",
        "PO",
        "PO_item",
        "PDT_EKPO",
        "profile",
        "firm_zone",
        "trade_off_zone",
        "confirmation_control_key",
        "order",
        "PO_quantity",
        "order_price_unit",
        "order_unit",
        "price_unit",
        "net_price",
        "cost_center",
        "account_type",
        "posting_date",
        "GL_account",
        "GR_IR_flag",
        "PO_date",
        "movement_type",
        "currency",
        "item_category",
        "material_document",
        "PR",
        "PR_item",
        "received_cost_center",
        "requested_cost_center",
        "requested_by",
        "requisitioner",
        "WBS_element",
        "delivery_date",
        "PO_type",
        "GR_quantity",
        "delivery_complete_flag",
        "order_confirmation",
        "PO_item_desc",
    ],
    FieldSlice::range(1, 47).with_max_split(46),
)
.filters(&[not_star("plant")])
.rules(&[
    ("PO_quantity", COMMAS),
    ("net_price", COMMAS),
    ("posting_date", DATE),
    ("PO_date", DATE),
    ("valid_start", DATE),
    ("valid_end", DATE),
    ("delivery_date", DATE),
    ("GR_quantity", COMMAS),
    ("price_unit", COMMAS),
    ("PO_item_desc", Rule::DropLastChar),
    ("PO_item", Rule::ZeroPad(5)),
    ("PR_item", Rule::ZeroPad(5)),
    ("PO_quantity", NUM_OR_MISSING),
    ("price_unit", NUM_OR_MISSING),
    ("net_price", NUM_OR_MISSING),
    ("GR_quantity", NUM_OR_MISSING),
])
.derived(&[Derivation::ProcurementType { target: "PR_type" }]);

const CSKS: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "controlling_area",
        "CC_TCC",
        "valid_to",
        "valid_from",
        "actual_primary",
        "plan_primary",
        "company_code",
        "business_area",
        "CC_category",
        "responsible",
        "responsible_user",
        "currency",
        "costing_sheet",
        "tax",
        "profit_center",
        "plant",
        "logical_system",
        "created_on",
        "created_by",
        "actual_secondary",
        "actual_revenue",
        "commitment",
        "plan_secondary",
        "plan_revenue",
        "allocation_method",
        "record_quantity",
        "department",
        "sub_sequence_CC",
        "usage",
        "application",
        "overhead_key",
        "country",
        "title",
        "name",
        "name_1",
        "name_2",
        "name_3",
        "city",
        "district",
        "street",
        "po_box",
        "postal_code",
        "po_bos_code",
        "region",
        "language",
        "telebox",
        "telephone_1",
        "telephone_2",
        "fax_number",
        "teletex",
        "telex",
        "data_line",
        "printer_name",
        "hierarchy",
        "cost_collector",
        "complete",
        "statistics_falg",
        "object_number",
        "function",
    ],
    FieldSlice::range(2, 62),
)
.rules(&[
    ("responsible", Rule::Uppercase),
    ("valid_to", STRICT_DATE),
    ("valid_from", STRICT_DATE),
    ("created_on", DATE),
])
.derived(&[
    Derivation::LengthCategory {
        target: "CC_TCC_category",
        source: "CC_TCC",
        len: 9,
        labels: Labels::new("CC", "TCC"),
    },
    Derivation::BothFlagged {
        target: "actual_block",
        first: "actual_primary",
        second: "actual_secondary",
        labels: Labels::new("blocked", "unblocked"),
    },
    Derivation::BothFlagged {
        target: "plan_block",
        first: "plan_primary",
        second: "plan_secondary",
        labels: Labels::new("blocked", "unblocked"),
    },
]);

const WORK_CENTER: ReportLayout = ReportLayout::pipes(
    &[
        "plant",
        "segment",
        "work_center",
        "short_description",
        "TCC",
        "level",
        "lower_level",
        "category",
        "capa_quantity",
        "is_deleted",
        "is_locked",
        "control_key",
        "subsystem",
    ],
    FieldSlice::range(1, 14),
)
.derived(&[Derivation::PrefixCategory {
    target: "EWC_MWC",
    source: "work_center",
    prefix: "SCT",
    labels: Labels::new("EWC", "MWC"),
}]);

// ============================================================================
// LAYOUTS 31 - 42
// ============================================================================

const IH08: ReportLayout = ReportLayout::pipes(
    &[
        "S",
        "equipment",
        "serial_number",
        "equipment_category",
        "planning_plant",
        "maintenance_plant",
        "technical_object_desc",
        "plant_section",
        "planner_group",
        "main_work_center",
        "cost_center",
        "super_equipment",
        "function_location",
        "ABC_flag",
        "inventory_number",
        "manufacturer_asset",
        "construction_year",
        "manufacturer_serial_number",
        "room",
        "technical_identification_number",
        "sort_field",
        "asset_number",
        "sub_asset_number",
        "object_type",
        "system_status",
        "user_status",
        "created_on",
        "created_by",
        "changed_on",
        "changed_by",
        "location",
        "construction_type",
        "material_number",
        "material_desc",
        "plant",
        "stock_location",
        "external_calibration",
        "model_number",
    ],
    FieldSlice::range(1, 39),
)
.rules(&[("created_on", DATE), ("changed_on", DATE)]);

const EKKO: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "PO",
        "company_code",
        "document_category",
        "document_type",
        "control",
        "delete_flas",
        "status",
        "created_on",
        "created_by",
        "item_interval",
        "last_item",
        "supplier_code",
        "language",
        "payment_terms",
        "payment_in_1",
        "payment_in_2",
        "payment_in_3",
        "disc_percent_1",
        "disc_percent_2",
        "purchase_organization",
        "purchase_group",
        "currency",
        "exchange_rate",
        "exchange_rate_fixed",
        "document_date",
        "valid_start",
        "valid_end",
        "application_by",
        "quotation_deadline",
        "binding_period",
        "warranty",
        "bid_invitation",
        "quotation",
        "quotation_date",
        "your_reference",
        "sales_person",
        "telephone",
        "vendor",
        "customer",
        "agreement",
        "field_not_used",
        "complete_delivery",
        "GR_message",
        "supply_plant",
        "receive_vendor",
        "incoterms",
        "incoterms_2",
        "target_value",
        "collective_number",
        "document_condition",
        "procedure",
        "update_group",
        "invoice_party",
        "foreign_trade_data_number",
        "our_reference",
        "logical_system",
        "subitem_interval",
        "time_dep_condition",
        "release_group",
        "release_strategy",
        "release_flag",
        "release_status",
        "subject_to_release",
        "report_country",
        "release_document",
        "address_number",
        "country_tax_number",
        "vat_reg_number",
        "reason_for_cancellation",
        "document_number",
    ],
    FieldSlice::range(2, 73),
)
.filters(&[RowFilter::KeyMinLength { field: "PO", len: 7 }])
.rules(&[
    ("created_on", DATE),
    ("document_date", DATE),
    ("valid_start", DATE),
    ("valid_end", DATE),
]);

const ROUTING_PP_APLAN: ReportLayout = ReportLayout::pipes(
    &[
        "MRP_controller",
        "plant_sp_material_status",
        "group",
        "group_counter",
        "segment_number",
        "MRP_type",
        "material_number",
        "material_description",
        "assembly_scrap (%)",
        "component_scrap (%)",
        "operation",
        "control_key",
        "work_center",
        "work_center_name",
        "number_splits",
        "costing_lot_size",
        "budget_lot_size",
        "operation_desc",
        "conversion_header",
        "conversion_operation",
        "base_quantity",
        "base_unit",
        "setup_time_machine",
        "setup_time_machine_unit",
        "activity_setup_time_machine",
        "production_time_machine",
        "production_time_machine_unit",
        "activity_production_time_machine",
        "sec_add_time_m",
        "sec_add_time_m_unit",
        "number_staff_setup",
        "number_staff_setup_unit",
        "activity_type_number_staff_setup",
        "number_staff_production",
        "unit_of_meas_for_stand_Val",
        "activity_number_stand_Val",
        "equivalence_tool",
        "equivalence_tool_unit",
        "activity_type_equivalence_tool",
        "valid_from",
        "usage",
        "status",
        "shop_box_rout_slip",
        "deletion_indicator",
        "delind_TL",
        "relevancy_to_costing_indicator",
        "required_splitting",
        "setup_group_category",
        "setup_group_key",
        "calculation_type",
    ],
    FieldSlice::range(1, 51),
)
.metadata(MetadataStyle::Routing)
.rules(&[
    ("valid_from", DATE),
    ("costing_lot_size", COMMAS),
    ("budget_lot_size", COMMAS),
    ("base_quantity", COMMAS),
]);

macro_rules! bom_fields {
    ($($extra:literal),*) => {
        &[
            "plant",
            "assembly_plant",
            "assembly_material",
            "assembly_description",
            "assembly_material_status",
            "assembly_procurement_type",
            "assembly_special_procurement_type",
            "assembly_material_type",
            "item_category",
            "alternative_group",
            "component",
            "component_description",
            "component_qty",
            "component_unit",
            "base_quantity",
            "Item_number",
            "bom_number",
            "component_material_type",
            "cost_relevant",
            "bom_usage",
            "alternative_bom",
            "usage_probability",
            "bom_status",
            "document",
            "document_part",
            "document_type",
            "version",
            "change_number",
            "component_scrap",
            "distribution_key",
            "component_procurement_type",
            "component_special_procurement_type",
            $($extra,)*
        ]
    };
}

const BOM_PP_STUELI: ReportLayout = ReportLayout::pipes(bom_fields!(), FieldSlice::range(1, 33)).rules(&[
    ("component_qty", NORM),
    ("base_quantity", NORM),
    ("component_qty", NUM),
    ("base_quantity", NUM),
]);

const BOM_PP_STUELI_FUTURE: ReportLayout = ReportLayout::pipes(
    bom_fields!("bom_valid_from", "operation_scrap"),
    FieldSlice::range(1, 35),
)
.rules(&[
    ("component_qty", COMMAS),
    ("base_quantity", COMMAS),
    ("bom_valid_from", DATE),
]);

const MM03_WHOLE: ReportLayout =
    ReportLayout::pipes(material_master_fields!("automatic_PO"), FieldSlice::range(1, 58));

const CSKT: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "language",
        "controlling_area",
        "CC_TCC",
        "valid_to",
        "Function",
        "CC_TCC_desc",
        "CC_TCC_short_text",
    ],
    FieldSlice::range(2, 10),
)
.rules(&[("valid_to", STRICT_DATE)]);

const ZPSEG_KST: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "controlling_area",
        "cost_center",
        "changed_date",
        "changed_time",
        "valid_from",
        "segment",
        "sub_segment",
        "group_of_types",
        "indicator",
        "changed_by",
        "plant",
    ],
    FieldSlice::range(2, 14),
)
.rules(&[("changed_date", DATE), ("valid_from", DATE)]);

const DN_MONITOR_ZLSVN: ReportLayout = ReportLayout::pipes(
    &[
        "delivery_number",
        "material_number",
        "created_by",
        "created_on",
        "created_time",
        "ship_to",
        "shipment",
        "ship_to_party_name",
    ],
    FieldSlice::range(0, 0),
)
.extraction(Extraction::DeliveryTokens)
.keep_first_row()
.rules(&[
    ("created_on", DATE),
    ("shipment", Rule::PlaceholderToMissing(crate::extract::DELIVERY_PLACEHOLDER)),
    ("material_number", Rule::PlaceholderToMissing(crate::extract::DELIVERY_PLACEHOLDER)),
]);

const COOIS_ORDER_COMPONENT: ReportLayout = ReportLayout::pipes(
    &[
        "order",
        "order_header",
        "item_category",
        "material_number",
        "bom_item",
        "requirement_date",
        "requirement_quantity",
        "quantity_withdrawn",
        "unit",
        "backflush_flag",
        "alternative_bom",
        "status",
        "work_center",
        "activity",
        "material_desc",
    ],
    FieldSlice::range(1, 16),
)
.rules(&[
    ("requirement_date", DATE),
    ("requirement_quantity", NORM),
    ("quantity_withdrawn", NORM),
]);

const SE16_DRAW: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "document_type",
        "document_number",
        "document_version",
        "document_part",
        "user_name",
        "document_status",
        "lab_office",
        "change_number",
        "plant",
        "deletion_flag",
        "CAD_flag",
        "sup_document",
        "sup_document_version",
        "sup_document_part",
        "sup_document_type",
        "authority_group",
    ],
    FieldSlice::range(2, 19),
);

const ZPSEG: ReportLayout = ReportLayout::pipes(
    &[
        "client",
        "plant",
        "segment",
        "segment_1",
        "segment_2",
        "segment_3",
        "segment_description",
        "responsible",
        "profit_center",
        "profit_center_new",
        "delete_date",
    ],
    FieldSlice::range(1, 12),
)
.rules(&[("client", Rule::LastWord), ("delete_date", DATE)])
.derived(&[Derivation::Concat {
    target: "segment_number",
    sources: &["segment", "segment_1", "segment_2", "segment_3"],
}]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::SliceEnd;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_is_complete_and_unique() {
        let codes: HashSet<&str> = ReportType::ALL.iter().map(|r| r.code()).collect();
        assert_eq!(codes.len(), 41);

        let numbers: Vec<u32> = ReportType::ALL.iter().map(|r| r.number()).collect();
        assert_eq!(numbers, (2..=42).collect::<Vec<u32>>());
    }

    #[test]
    fn test_from_code_variants() {
        assert_eq!(ReportType::from_code("03_MB51"), Some(ReportType::Mb51));
        assert_eq!(ReportType::from_code("mb51"), Some(ReportType::Mb51));
        assert_eq!(ReportType::from_code("3"), Some(ReportType::Mb51));
        assert_eq!(ReportType::from_code("23"), Some(ReportType::CostReport));
        assert_eq!(ReportType::from_code("99"), None);
        assert_eq!(ReportType::from_code("NOPE"), None);
    }

    #[test]
    fn test_field_counts_match_slices() {
        for report in ReportType::ALL {
            let layout = report.layout();
            let slice = match layout.extraction {
                Extraction::Pipes(slice) => slice,
                Extraction::PipesWithMinCount { slice, .. } => slice,
                Extraction::DeliveryTokens => continue,
            };
            if let SliceEnd::At(end) = slice.end {
                assert_eq!(
                    end - slice.start,
                    layout.fields.len(),
                    "{} declares {} fields",
                    report,
                    layout.fields.len()
                );
            }
        }
    }

    #[test]
    fn test_rules_reference_known_columns() {
        let metadata = [
            "file_name",
            "creation_time",
            "last_modified_time",
            "year_month",
            "year_month_day",
        ];
        for report in ReportType::ALL {
            let layout = report.layout();
            let mut known: HashSet<&str> = layout.fields.iter().copied().collect();
            known.extend(metadata);
            if let Some(unpivot) = layout.unpivot {
                known.insert(unpivot.value_name);
            }
            for (column, _) in layout.rules.iter().chain(layout.late_rules) {
                assert!(known.contains(column), "{}: rule on unknown column {}", report, column);
            }
        }
    }

    #[test]
    fn test_column_order_is_a_permutation() {
        for report in [ReportType::ZprlValue, ReportType::ZprlQty] {
            let layout = report.layout();
            let order = layout.column_order.unwrap();
            let mut a: Vec<&str> = order.to_vec();
            let mut b: Vec<&str> = layout.fields.to_vec();
            a.sort();
            b.sort();
            assert_eq!(a, b);
        }
    }
}
