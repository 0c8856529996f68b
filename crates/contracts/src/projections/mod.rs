pub mod p900_production_schedule;
pub mod p901_plant_service_orders;
pub mod p902_backorders;
